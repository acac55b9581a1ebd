use thiserror::Error;
use yeelight_api::ApiError;
use yeelight_channel::ChannelError;
use yeelight_state::StateError;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Command channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("State management error: {0}")]
    State(#[from] StateError),

    #[error("Light not found: {0}")]
    LightNotFound(String),

    #[error("Light already registered: {0}")]
    DuplicateLight(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl SdkError {
    /// A parameter was rejected before anything was sent
    pub fn is_validation(&self) -> bool {
        matches!(self, SdkError::Api(err) if err.is_validation())
    }

    /// The light could not be reached within the attempt budget
    pub fn is_transport(&self) -> bool {
        match self {
            SdkError::Channel(ChannelError::AttemptsExhausted { .. }) => true,
            SdkError::Channel(err) => err.is_transport(),
            _ => false,
        }
    }
}

impl From<yeelight_api::ValidationError> for SdkError {
    fn from(err: yeelight_api::ValidationError) -> Self {
        SdkError::Api(err.into())
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
