//! Daemon websocket messages.
//!
//! Every request and reply on the daemon socket is one JSON text frame:
//!
//! ```json
//! {"command":"exit","ack":false,"data":{},"request_id":"…","destination":"daemon","origin":"netswitch"}
//! ```
//!
//! Replies echo `request_id` with `ack: true`; the outcome sits in `data`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command that shuts down the daemon and every service it started.
pub(crate) const EXIT_COMMAND: &str = "exit";

const DESTINATION: &str = "daemon";
const ORIGIN: &str = "netswitch";

#[derive(Debug, Serialize)]
struct Request<'a> {
    command: &'a str,
    ack: bool,
    data: Value,
    request_id: &'a str,
    destination: &'a str,
    origin: &'a str,
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    request_id: String,
    #[serde(default)]
    data: ReplyData,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyData {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// A fresh random request id, 32 hex digits.
pub(crate) fn request_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Encode the exit request.
pub(crate) fn exit_request(request_id: &str) -> String {
    let request = Request {
        command: EXIT_COMMAND,
        ack: false,
        data: Value::Object(Default::default()),
        request_id,
        destination: DESTINATION,
        origin: ORIGIN,
    };
    // Only strings and an empty object; serialization cannot fail.
    serde_json::to_string(&request).unwrap_or_default()
}

/// What a text frame means for the request awaiting an answer.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Answer {
    /// The frame belongs to some other exchange.
    Unrelated,
    /// The daemon accepted the request.
    Accepted,
    /// The daemon refused, with its reason.
    Refused(String),
}

/// Interpret a text frame as the answer to `request_id`.
pub(crate) fn answer(frame: &str, request_id: &str) -> Result<Answer, serde_json::Error> {
    let reply: Reply = serde_json::from_str(frame)?;
    if reply.request_id != request_id {
        return Ok(Answer::Unrelated);
    }
    Ok(if reply.data.success {
        Answer::Accepted
    } else {
        Answer::Refused(
            reply
                .data
                .error
                .unwrap_or_else(|| "unknown error".to_string()),
        )
    })
}
