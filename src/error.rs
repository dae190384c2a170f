//! Validation errors raised while turning feed documents into core records.
//!
//! Missing optional data is never an error; it is defaulted where it is
//! displayed. These variants cover only input the core cannot work without.

pub type GamecastResult<T> = Result<T, GamecastError>;

#[derive(Debug, thiserror::Error)]
pub enum GamecastError {
    /// A play slot in the feed was null or not an object.
    #[error("play record missing at index {0}")]
    MissingPlay(usize),

    /// A mandatory field was absent from an otherwise present record.
    #[error("{record} is missing mandatory field `{field}`")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    /// A field was present but carried a value the core does not recognise.
    #[error("{record} has invalid value {value:?} for field `{field}`")]
    InvalidValue {
        record: &'static str,
        field: &'static str,
        value: String,
    },

    /// A playback entry carried neither an encoding name nor a url.
    #[error("highlight {item_id}: playback #{index} has neither name nor url")]
    MalformedVariant { item_id: String, index: usize },

    /// The document itself could not be decoded.
    #[error("invalid {document} json: {source}")]
    InvalidJson {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The document body was empty or `null` where one is required.
    #[error("empty {0} document")]
    EmptyDocument(&'static str),
}

impl GamecastError {
    pub fn missing_field(record: &'static str, field: &'static str) -> Self {
        Self::MissingField { record, field }
    }

    pub fn invalid_value(record: &'static str, field: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            record,
            field,
            value: value.to_string(),
        }
    }

    pub fn invalid_json(document: &'static str, source: serde_json::Error) -> Self {
        Self::InvalidJson { document, source }
    }
}
