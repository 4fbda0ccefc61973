pub mod error;
pub mod feed;
pub mod gesture;
pub mod media;
pub mod player;
pub mod shuffle;
pub mod viewer;

// Re-exports
pub use error::{FeedError, PlayerError};
pub use feed::{FeedLoader, FeedRecord, FeedSnapshot, MIN_LOADING_MS};
pub use gesture::{Gesture, GestureRecognizer};
pub use media::{MediaDescriptor, MediaKind, classify};
pub use player::{
    EmbedInstance, EmbedProvider, PlaybackState, PlayerLifecycleManager, PresentationId,
};
pub use shuffle::{ShuffleSequencer, previous_index};
pub use viewer::{
    ItemView, ModalLayout, ModalView, PresentationMode, RenderTarget, ViewerController,
};
