use apod_core::error::PlayerError;
use apod_core::{EmbedInstance, EmbedProvider, PlaybackState};
use log::{debug, info};

/// Embed provider for the terminal front end.
///
/// A terminal cannot host the real iframe player, so this provider tracks
/// the play/pause state the lifecycle manager drives and leaves actual
/// playback to the deep link the modal offers.
#[derive(Debug, Default)]
pub struct TerminalEmbedProvider;

pub struct TerminalEmbed {
    video_id: String,
    state: PlaybackState,
}

impl EmbedProvider for TerminalEmbedProvider {
    type Instance = TerminalEmbed;

    async fn load_api(&self) -> Result<(), PlayerError> {
        info!("Embed provider ready (terminal, deep links only)");
        Ok(())
    }

    async fn create(&self, video_id: &str) -> Result<Self::Instance, PlayerError> {
        debug!("Creating terminal embed for {}", video_id);
        Ok(TerminalEmbed {
            video_id: video_id.to_string(),
            state: PlaybackState::Paused,
        })
    }
}

impl EmbedInstance for TerminalEmbed {
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
        debug!("Destroying terminal embed for {}", self.video_id);
    }
}
