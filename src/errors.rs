use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Failure raised by the transport underneath the client
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("hyper error")]
    Hyper(hyper::Error),
    #[error("connection refused")]
    ConnectionRefused(Box<dyn StdError + Send + Sync>),
    #[error("connection reset")]
    ConnectionReset(Box<dyn StdError + Send + Sync>),
    #[error("http error")]
    Http(#[from] http::Error),
    #[error("ssl support was disabled at compile time")]
    SslDisabled,
}

impl From<hyper::Error> for TransportError {
    fn from(err: hyper::Error) -> Self {
        if err.is_connect() {
            use std::error::Error as _;
            return match err
                .source()
                .and_then(|e| e.downcast_ref::<io::Error>())
                .map(|e| e.kind())
            {
                Some(io::ErrorKind::ConnectionRefused) => {
                    TransportError::ConnectionRefused(Box::new(err))
                }
                Some(io::ErrorKind::ConnectionReset) => {
                    TransportError::ConnectionReset(Box::new(err))
                }
                _ => TransportError::Hyper(err),
            };
        }
        TransportError::Hyper(err)
    }
}

/// Errors returned by every `EventHub` operation
#[derive(Error, Debug)]
pub enum Error {
    /// A caller-supplied argument failed a precondition. Raised before any I/O.
    #[error("illegal input: {message}")]
    IllegalInput { message: String },
    /// The server replied with a status outside the accepted set
    #[error("unexpected response code {actual}, expected one of {accepted:?}")]
    UnexpectedResponseCode { accepted: Vec<u16>, actual: u16 },
    /// The body was absent, empty, unparseable, or of the wrong shape
    #[error("badly formed response body: {message}")]
    BadlyFormedResponseBody {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
    #[error("transport error")]
    Transport(#[from] TransportError),
}

impl Error {
    pub(crate) fn illegal_input(message: impl Into<String>) -> Self {
        Error::IllegalInput {
            message: message.into(),
        }
    }

    pub(crate) fn badly_formed(message: impl Into<String>) -> Self {
        Error::BadlyFormedResponseBody {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn badly_formed_by<E>(message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::BadlyFormedResponseBody {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
