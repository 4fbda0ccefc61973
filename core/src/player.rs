use std::collections::HashMap;

use log::{debug, warn};
use tokio::sync::OnceCell;

use crate::error::PlayerError;
use crate::media::youtube::watch_url;

/// Identifies one open presentation (inline card or modal) that may host an
/// embed. Handles live in a side table keyed by this id rather than being
/// attached to render-target objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PresentationId(pub u64);

/// Provider-reported playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Unknown,
}

/// Surface the external embeddable player exposes.
///
/// Implementations wrap whatever the host environment offers; tests use
/// scripted mocks.
#[allow(async_fn_in_trait)]
pub trait EmbedProvider {
    type Instance: EmbedInstance;

    /// One-time provider bootstrap. The manager guarantees this runs at most
    /// once process-wide regardless of how many acquisitions race on it.
    async fn load_api(&self) -> Result<(), PlayerError>;

    /// Construct a player for the given video id.
    async fn create(&self, video_id: &str) -> Result<Self::Instance, PlayerError>;
}

/// One constructed player.
pub trait EmbedInstance {
    fn play(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self) -> Result<(), PlayerError>;
    fn state(&self) -> PlaybackState;
    /// Must tolerate being called after the underlying provider object is
    /// already gone.
    fn destroy(&mut self);
}

/// Memoized one-shot provider bootstrap.
///
/// Concurrent callers share the single in-flight load instead of each
/// re-triggering it; once resolved, every later call reuses the result.
#[derive(Debug, Default)]
pub struct ApiLoad {
    cell: OnceCell<()>,
}

impl ApiLoad {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn ensure<P: EmbedProvider>(&self, provider: &P) -> Result<(), PlayerError> {
        self.cell
            .get_or_try_init(|| provider.load_api())
            .await
            .copied()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

#[derive(Debug)]
enum HandleState<I> {
    /// Creation is in flight; a second acquire for the same presentation is
    /// a no-op while this is set.
    Creating,
    Ready(I),
    /// Terminal. The broken embed is never retried; the viewer renders the
    /// "open externally" fallback instead.
    Failed,
}

/// Lifecycle record for one presentation's embed.
#[derive(Debug)]
pub struct PlayerHandle<I> {
    video_id: String,
    state: HandleState<I>,
}

impl<I> PlayerHandle<I> {
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, HandleState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, HandleState::Failed)
    }
}

/// Owns every live [`PlayerHandle`]: at most one per presentation, created
/// at most once, torn down deterministically when its presentation closes or
/// is superseded.
pub struct PlayerLifecycleManager<P: EmbedProvider> {
    provider: P,
    api: ApiLoad,
    handles: HashMap<PresentationId, PlayerHandle<P::Instance>>,
}

impl<P: EmbedProvider> PlayerLifecycleManager<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            api: ApiLoad::new(),
            handles: HashMap::new(),
        }
    }

    pub fn handle(&self, presentation: PresentationId) -> Option<&PlayerHandle<P::Instance>> {
        self.handles.get(&presentation)
    }

    /// Materialize a player for `presentation`.
    ///
    /// No-op when a handle already exists or creation is already in flight
    /// for it. On ready, autoplay is attempted and a refusal is swallowed.
    /// Creation failures leave the handle in its terminal failed state; they
    /// are logged, not returned.
    pub async fn acquire(&mut self, presentation: PresentationId, video_id: &str) {
        if self.handles.contains_key(&presentation) {
            debug!(
                "Player already exists or is being created for {:?}",
                presentation
            );
            return;
        }

        self.handles.insert(
            presentation,
            PlayerHandle {
                video_id: video_id.to_string(),
                state: HandleState::Creating,
            },
        );

        let created = match self.api.ensure(&self.provider).await {
            Ok(()) => self.provider.create(video_id).await,
            Err(e) => Err(e),
        };

        // The presentation may have been destroyed while we awaited.
        let Some(handle) = self.handles.get_mut(&presentation) else {
            if let Ok(mut instance) = created {
                instance.destroy();
            }
            return;
        };

        match created {
            Ok(mut instance) => {
                if let Err(e) = instance.play() {
                    debug!("Autoplay refused for {}: {}", video_id, e);
                }
                handle.state = HandleState::Ready(instance);
            }
            Err(e) => {
                warn!("Embed creation failed for {}: {}", video_id, e);
                handle.state = HandleState::Failed;
            }
        }
    }

    /// Provider-reported state of the presentation's player, `Unknown` when
    /// there is none or it is not ready.
    pub fn playback_state(&self, presentation: PresentationId) -> PlaybackState {
        match self.handles.get(&presentation) {
            Some(PlayerHandle {
                state: HandleState::Ready(instance),
                ..
            }) => instance.state(),
            _ => PlaybackState::Unknown,
        }
    }

    /// Issue the inverse of the current playing/paused state. Unknown or
    /// untracked state is a no-op.
    pub fn toggle_playback(&mut self, presentation: PresentationId) {
        let Some(handle) = self.handles.get_mut(&presentation) else {
            return;
        };
        let HandleState::Ready(instance) = &mut handle.state else {
            return;
        };

        let result = match instance.state() {
            PlaybackState::Playing => instance.pause(),
            PlaybackState::Paused => instance.play(),
            PlaybackState::Unknown => return,
        };
        if let Err(e) = result {
            warn!("Playback toggle failed for {}: {}", handle.video_id, e);
        }
    }

    /// Record an asynchronous playback failure from the provider. The handle
    /// becomes terminal and is not retried.
    pub fn report_playback_error(&mut self, presentation: PresentationId, detail: &str) {
        let Some(handle) = self.handles.get_mut(&presentation) else {
            return;
        };
        warn!(
            "Playback error on {:?} ({}): {}",
            presentation, handle.video_id, detail
        );
        if let HandleState::Ready(instance) = &mut handle.state {
            instance.destroy();
        }
        handle.state = HandleState::Failed;
    }

    /// Deep link for the "open externally" fallback of a failed embed.
    pub fn fallback_link(&self, presentation: PresentationId) -> Option<String> {
        let handle = self.handles.get(&presentation)?;
        handle.is_failed().then(|| watch_url(&handle.video_id))
    }

    /// Tear down the handle for `presentation`. Idempotent: repeated calls
    /// and calls for presentations that never had a player are no-ops.
    pub fn destroy(&mut self, presentation: PresentationId) {
        if let Some(mut handle) = self.handles.remove(&presentation) {
            debug!("Destroying player for {:?}", presentation);
            if let HandleState::Ready(instance) = &mut handle.state {
                instance.destroy();
            }
        }
    }

    /// Tear down every handle, e.g. when the snapshot is replaced.
    pub fn destroy_all(&mut self) {
        let ids: Vec<PresentationId> = self.handles.keys().copied().collect();
        for id in ids {
            self.destroy(id);
        }
    }

    pub fn live_handles(&self) -> usize {
        self.handles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts API loads and instance creations; scripted to fail on demand.
    #[derive(Clone, Default)]
    struct MockProvider {
        api_loads: Arc<AtomicUsize>,
        creations: Arc<AtomicUsize>,
        fail_create: bool,
    }

    struct MockInstance {
        state: PlaybackState,
        destroyed: bool,
    }

    impl EmbedProvider for MockProvider {
        type Instance = MockInstance;

        async fn load_api(&self) -> Result<(), PlayerError> {
            // Yield so racing callers genuinely overlap on the cell.
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.api_loads.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn create(&self, video_id: &str) -> Result<Self::Instance, PlayerError> {
            if self.fail_create {
                return Err(PlayerError::Create(format!("no embed for {}", video_id)));
            }
            self.creations.fetch_add(1, Ordering::SeqCst);
            Ok(MockInstance {
                state: PlaybackState::Paused,
                destroyed: false,
            })
        }
    }

    impl EmbedInstance for MockInstance {
        fn play(&mut self) -> Result<(), PlayerError> {
            self.state = PlaybackState::Playing;
            Ok(())
        }

        fn pause(&mut self) -> Result<(), PlayerError> {
            self.state = PlaybackState::Paused;
            Ok(())
        }

        fn state(&self) -> PlaybackState {
            self.state
        }

        fn destroy(&mut self) {
            self.destroyed = true;
        }
    }

    #[tokio::test]
    async fn concurrent_api_loads_share_one_bootstrap() {
        let provider = MockProvider::default();
        let api = ApiLoad::new();

        let (a, b) = tokio::join!(api.ensure(&provider), api.ensure(&provider));
        a.unwrap();
        b.unwrap();

        assert_eq!(provider.api_loads.load(Ordering::SeqCst), 1);
        assert!(api.is_loaded());
    }

    #[tokio::test]
    async fn double_acquire_creates_one_instance() {
        let provider = MockProvider::default();
        let creations = provider.creations.clone();
        let mut manager = PlayerLifecycleManager::new(provider);
        let id = PresentationId(1);

        manager.acquire(id, "abc12345678").await;
        manager.acquire(id, "abc12345678").await;

        assert_eq!(creations.load(Ordering::SeqCst), 1);
        assert!(manager.handle(id).is_some_and(|h| h.is_ready()));
    }

    #[tokio::test]
    async fn acquire_autoplays_on_ready() {
        let mut manager = PlayerLifecycleManager::new(MockProvider::default());
        let id = PresentationId(1);

        manager.acquire(id, "abc12345678").await;
        assert_eq!(manager.playback_state(id), PlaybackState::Playing);
    }

    #[tokio::test]
    async fn toggle_inverts_playback_state() {
        let mut manager = PlayerLifecycleManager::new(MockProvider::default());
        let id = PresentationId(1);
        manager.acquire(id, "abc12345678").await;

        manager.toggle_playback(id);
        assert_eq!(manager.playback_state(id), PlaybackState::Paused);
        manager.toggle_playback(id);
        assert_eq!(manager.playback_state(id), PlaybackState::Playing);
    }

    #[tokio::test]
    async fn toggle_on_untracked_presentation_is_a_noop() {
        let mut manager = PlayerLifecycleManager::new(MockProvider::default());
        manager.toggle_playback(PresentationId(42));
        assert_eq!(
            manager.playback_state(PresentationId(42)),
            PlaybackState::Unknown
        );
    }

    #[tokio::test]
    async fn failed_creation_yields_terminal_state_with_fallback() {
        let provider = MockProvider {
            fail_create: true,
            ..Default::default()
        };
        let mut manager = PlayerLifecycleManager::new(provider);
        let id = PresentationId(1);

        manager.acquire(id, "abc12345678").await;

        let handle = manager.handle(id).unwrap();
        assert!(handle.is_failed());
        assert_eq!(
            manager.fallback_link(id).as_deref(),
            Some("https://www.youtube.com/watch?v=abc12345678")
        );
        // Not retried: a second acquire is a no-op on the failed handle.
        manager.acquire(id, "abc12345678").await;
        assert!(manager.handle(id).unwrap().is_failed());
    }

    #[tokio::test]
    async fn playback_error_flips_ready_handle_to_failed() {
        let mut manager = PlayerLifecycleManager::new(MockProvider::default());
        let id = PresentationId(1);
        manager.acquire(id, "abc12345678").await;

        manager.report_playback_error(id, "embed refused");
        assert!(manager.handle(id).unwrap().is_failed());
        assert!(manager.fallback_link(id).is_some());
    }

    #[tokio::test]
    async fn destroy_is_idempotent() {
        let mut manager = PlayerLifecycleManager::new(MockProvider::default());
        let id = PresentationId(1);

        // Never created: still fine.
        manager.destroy(id);

        manager.acquire(id, "abc12345678").await;
        manager.destroy(id);
        manager.destroy(id);
        assert!(manager.handle(id).is_none());
        assert_eq!(manager.live_handles(), 0);
    }
}
