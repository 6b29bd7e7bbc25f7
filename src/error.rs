#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Non-success HTTP status. The message is the server's JSON `message`
    /// field when the body carries one, otherwise a synthesized
    /// `HTTP error <status>: <status text>` line.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),
}
