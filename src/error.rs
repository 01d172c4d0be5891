pub type SlideResult<T> = Result<T, SlideError>;

#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("route {path} does not match any entry in {within}")]
    NoMatch { path: String, within: &'static str },
    #[error("redirect chain starting at {path} does not settle")]
    RedirectLoop { path: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("session storage: {0}")]
    Storage(String),
}

impl From<std::io::Error> for SlideError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl SlideError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn no_match(path: impl Into<String>, within: &'static str) -> Self {
        Self::NoMatch {
            path: path.into(),
            within,
        }
    }

    pub fn redirect_loop(path: impl Into<String>) -> Self {
        Self::RedirectLoop { path: path.into() }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}
