use derive_more::{Display, From};

pub type Result<T> = anyhow::Result<T, Error>;

#[derive(Debug, From, Display)]
pub enum Error {
    #[from]
    Custom(String),

    #[display(fmt = "could not connect to {}: {}", _0, _1)]
    Connection(String, std::io::Error),

    #[display(fmt = "invalid utf-8 sequence after {} valid bytes", _0)]
    Decode(usize),

    #[display(fmt = "peer closed the stream")]
    StreamClosed,

    InvalidEndpoint(String),

    #[from]
    IO(std::io::Error),
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self::Custom(value.to_string())
    }
}
