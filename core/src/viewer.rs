use log::{debug, error, info};

use crate::error::FeedError;
use crate::feed::{FeedRecord, FeedSnapshot};
use crate::gesture::Gesture;
use crate::media::{MediaDescriptor, MediaKind, classify};
use crate::player::{EmbedProvider, PlayerLifecycleManager, PresentationId};
use crate::shuffle::{ShuffleSequencer, previous_index};

/// Which presentation is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    /// Single-item view in the page flow.
    Inline,
    /// Full-overlay lightbox.
    Modal,
}

/// Instruction to render the inline single view at one position.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub index: usize,
    pub descriptor: MediaDescriptor,
}

/// Viewport-relative sizing for the modal media box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModalLayout {
    /// Embeds get a fixed box: 80% of viewport height, capped at 95%.
    VideoBox { height: f32, max_height: f32 },
    /// Images and everything else fit within 80% height, aspect preserved.
    FitBox { max_height: f32 },
}

impl ModalLayout {
    pub fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::YouTubeVideo | MediaKind::DirectVideoFile | MediaKind::GenericEmbed => {
                ModalLayout::VideoBox {
                    height: 0.80,
                    max_height: 0.95,
                }
            }
            MediaKind::Image | MediaKind::Empty => ModalLayout::FitBox { max_height: 0.80 },
        }
    }
}

/// Instruction to open (or replace) the modal for one position.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalView {
    pub index: usize,
    pub descriptor: MediaDescriptor,
    pub layout: ModalLayout,
    /// Title/date/explanation, one line per present field. Empty means no
    /// caption block at all.
    pub caption: Vec<String>,
    /// Set after an embed playback failure: the "open externally" deep link
    /// rendered instead of the broken embed.
    pub fallback_link: Option<String>,
}

/// Where render instructions go.
///
/// The controller never assumes an output technology; the terminal front end
/// and the tests both implement this.
pub trait RenderTarget {
    fn show_loading(&mut self);
    fn show_error(&mut self, message: &str);
    fn show_item(&mut self, view: ItemView);
    /// Open the modal, replacing its content if one is already shown.
    fn open_modal(&mut self, view: ModalView);
    fn close_modal(&mut self);
}

/// Orchestrates the feed snapshot, shuffled traversal, presentation mode and
/// embed lifecycle, handing render instructions to the target.
pub struct ViewerController<R: RenderTarget, P: EmbedProvider> {
    target: R,
    players: PlayerLifecycleManager<P>,
    snapshot: FeedSnapshot,
    sequencer: ShuffleSequencer,
    current: usize,
    inline: Option<PresentationId>,
    modal: Option<PresentationId>,
    next_presentation: u64,
}

impl<R: RenderTarget, P: EmbedProvider> ViewerController<R, P> {
    pub fn new(target: R, provider: P) -> Self {
        Self::with_sequencer(target, provider, ShuffleSequencer::new())
    }

    /// Constructor taking a pre-seeded sequencer, for reproducible orders.
    pub fn with_sequencer(target: R, provider: P, sequencer: ShuffleSequencer) -> Self {
        Self {
            target,
            players: PlayerLifecycleManager::new(provider),
            snapshot: FeedSnapshot::default(),
            sequencer,
            current: 0,
            inline: None,
            modal: None,
            next_presentation: 0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn mode(&self) -> PresentationMode {
        if self.modal.is_some() {
            PresentationMode::Modal
        } else {
            PresentationMode::Inline
        }
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut R {
        &mut self.target
    }

    pub fn current_record(&self) -> Option<&FeedRecord> {
        self.snapshot.get(self.current)
    }

    fn fresh_presentation(&mut self) -> PresentationId {
        self.next_presentation += 1;
        PresentationId(self.next_presentation)
    }

    /// Forward the loading indicator to the target.
    pub fn show_loading(&mut self) {
        self.target.show_loading();
    }

    /// Apply the outcome of a feed load.
    ///
    /// A failed load and an empty feed are both page-level messages; a
    /// non-empty feed becomes the new snapshot, seeds the shuffle order and
    /// shows the first shuffled item inline.
    pub fn apply_load(&mut self, outcome: Result<FeedSnapshot, FeedError>) {
        match outcome {
            Err(e) => {
                error!("Feed load failed: {}", e);
                self.target.show_error("Unable to load images.");
            }
            Ok(snapshot) if snapshot.is_empty() => {
                self.install_snapshot(snapshot);
                self.target.show_error("No images");
            }
            Ok(snapshot) => {
                info!("Feed loaded with {} records", snapshot.len());
                self.install_snapshot(snapshot);
                self.show_inline(self.current);
            }
        }
    }

    /// Replace the snapshot: tears down every player handle, drops the
    /// pending shuffle order, reseeds it and picks the starting index.
    fn install_snapshot(&mut self, snapshot: FeedSnapshot) {
        self.close_modal();
        self.players.destroy_all();
        self.inline = None;
        self.snapshot = snapshot;
        self.sequencer.clear();
        self.current = 0;

        if !self.snapshot.is_empty() {
            self.sequencer.reseed(self.snapshot.len(), None);
            if let Some(first) = self.sequencer.next() {
                self.current = first;
            }
        }
    }

    /// Render the inline single view at `index`. Out-of-bounds is a silent
    /// no-op. The previous presentation (and any player handle it held) is
    /// torn down first; at most one live presentation at a time.
    pub fn show_inline(&mut self, index: usize) {
        let Some(record) = self.snapshot.get(index) else {
            debug!("Ignoring out-of-bounds inline render: {}", index);
            return;
        };
        let descriptor = classify(record);

        if let Some(previous) = self.inline.take() {
            self.players.destroy(previous);
        }
        self.current = index;
        self.inline = Some(self.fresh_presentation());
        self.target.show_item(ItemView { index, descriptor });
    }

    /// Forward navigation: pop the next shuffled index, reseeding first when
    /// the cycle has drained (avoiding an immediate repeat of the current
    /// item). Renders in whichever mode is active.
    pub async fn advance(&mut self) {
        let n = self.snapshot.len();
        if n == 0 {
            return;
        }
        if self.sequencer.is_empty() {
            self.sequencer.reseed(n, Some(self.current));
        }
        let Some(next) = self.sequencer.next() else {
            return;
        };
        self.render_at(next).await;
    }

    /// Backward navigation: sequential `(current - 1 + n) mod n`, shuffle
    /// order untouched. Renders in whichever mode is active.
    pub async fn retreat(&mut self) {
        let Some(previous) = previous_index(self.current, self.snapshot.len()) else {
            return;
        };
        self.render_at(previous).await;
    }

    async fn render_at(&mut self, index: usize) {
        if self.modal.is_some() {
            self.open_modal(index).await;
        } else {
            self.show_inline(index);
        }
    }

    /// Open the modal at `index`. Out-of-bounds is a silent no-op. Any
    /// previously open modal is closed (its player destroyed) first. For
    /// YouTube records a player is acquired; if that fails the modal is
    /// re-rendered with the "open externally" fallback.
    pub async fn open_modal(&mut self, index: usize) {
        let Some(record) = self.snapshot.get(index) else {
            debug!("Ignoring out-of-bounds modal open: {}", index);
            return;
        };
        let descriptor = classify(record);
        let caption = caption_lines(record);

        self.close_modal();
        self.current = index;

        let presentation = self.fresh_presentation();
        self.modal = Some(presentation);
        let layout = ModalLayout::for_kind(descriptor.kind);
        self.target.open_modal(ModalView {
            index,
            descriptor: descriptor.clone(),
            layout,
            caption: caption.clone(),
            fallback_link: None,
        });

        if descriptor.kind == MediaKind::YouTubeVideo {
            if let Some(video_id) = descriptor.youtube_id.clone() {
                self.players.acquire(presentation, &video_id).await;
                // The modal may have been closed while creation awaited.
                if self.modal == Some(presentation)
                    && self.players.handle(presentation).is_some_and(|h| h.is_failed())
                {
                    self.render_modal_fallback(index, descriptor, layout, caption, presentation);
                }
            }
        }
    }

    /// Close the modal, destroying its player handle. Idempotent: closing
    /// with nothing open is a no-op. Triggered by the explicit close action,
    /// a click on the overlay background, or Escape.
    pub fn close_modal(&mut self) {
        if let Some(presentation) = self.modal.take() {
            self.players.destroy(presentation);
            self.target.close_modal();
        }
    }

    /// Toggle playback of the modal's embed; no-op without an open modal or
    /// a ready player.
    pub fn toggle_modal_playback(&mut self) {
        if let Some(presentation) = self.modal {
            self.players.toggle_playback(presentation);
        }
    }

    /// Provider-reported embed failure for the open modal. The embed is
    /// swapped for the fallback affordance; page-level state is untouched.
    pub fn on_playback_error(&mut self, detail: &str) {
        let Some(presentation) = self.modal else {
            return;
        };
        self.players.report_playback_error(presentation, detail);

        let Some(record) = self.snapshot.get(self.current) else {
            return;
        };
        let descriptor = classify(record);
        let caption = caption_lines(record);
        let layout = ModalLayout::for_kind(descriptor.kind);
        self.render_modal_fallback(self.current, descriptor, layout, caption, presentation);
    }

    fn render_modal_fallback(
        &mut self,
        index: usize,
        descriptor: MediaDescriptor,
        layout: ModalLayout,
        caption: Vec<String>,
        presentation: PresentationId,
    ) {
        let fallback_link = self.players.fallback_link(presentation);
        self.target.open_modal(ModalView {
            index,
            descriptor,
            layout,
            caption,
            fallback_link,
        });
    }

    /// Map a recognized gesture onto viewer operations. Input adapters do no
    /// navigation logic of their own.
    pub async fn on_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::SwipeLeft => self.advance().await,
            Gesture::SwipeRight => self.retreat().await,
            Gesture::Tap => {
                if self.modal.is_none() && !self.snapshot.is_empty() {
                    self.open_modal(self.current).await;
                }
            }
            Gesture::DoubleTap => self.toggle_modal_playback(),
        }
    }
}

/// Caption lines for the modal: title, date, explanation, each only when
/// present and non-empty.
fn caption_lines(record: &FeedRecord) -> Vec<String> {
    [&record.title, &record.date, &record.explanation]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect()
}
