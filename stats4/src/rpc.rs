use std::io::{BufRead, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{GameResult, RatingTracker};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// A JSON-RPC call.
///
/// Parameters are always positional. An `id` of `null` (or no `id` at all)
/// marks a notification, which gets no response when it succeeds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

/// The answer to an [`RpcRequest`], carrying either a result or an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(flatten)]
    pub outcome: RpcOutcome,
    pub id: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcOutcome {
    Result(Value),
    Error(RpcError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    /// Diagnostic details, such as the chain of underlying errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub data: Option<String>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    fn with_source(mut self, err: &dyn std::error::Error) -> Self {
        let mut chain = vec![err.to_string()];
        let mut source = err.source();
        while let Some(err) = source {
            chain.push(err.to_string());
            source = err.source();
        }
        self.data = Some(chain.join(": "));
        self
    }
}

impl std::error::Error for RpcError {}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl RpcResponse {
    fn new(id: Value, outcome: RpcOutcome) -> Self {
        Self {
            jsonrpc: String::from("2.0"),
            outcome,
            id,
        }
    }
}

/// Something whose methods can be called remotely.
///
/// [`RatingTracker`] offers `get_statistics` with the parameters
/// `[[name, ...]]` and `record_game` with `[player_1, player_2, result]`,
/// where `result` is 0 for a draw or the winning seat. A result may be given
/// as an integral float such as `1.0`.
pub trait RpcModule {
    fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError>;
}

impl RpcModule for RatingTracker {
    fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        match method {
            "get_statistics" => {
                check_arity(method, &params, 1)?;
                let names: Vec<String> = param(&params, 0, "players")?;
                to_result(&self.get_statistics(&names))
            }
            "record_game" => {
                check_arity(method, &params, 3)?;
                let player_1: String = param(&params, 0, "player_1")?;
                let player_2: String = param(&params, 1, "player_2")?;
                let code: f64 = param(&params, 2, "result")?;
                let result = game_result(code)?;
                let stats = self
                    .record_game(&player_1, &player_2, result)
                    .map_err(|err| RpcError::invalid_params(err.to_string()))?;
                to_result(&stats)
            }
            _ => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Unknown method '{}'", method),
            )),
        }
    }
}

fn check_arity(method: &str, params: &[Value], expected: usize) -> Result<(), RpcError> {
    if params.len() != expected {
        return Err(RpcError::invalid_params(format!(
            "'{}' takes {} parameters, but {} were given",
            method,
            expected,
            params.len()
        )));
    }
    Ok(())
}

fn param<T: DeserializeOwned>(params: &[Value], idx: usize, name: &str) -> Result<T, RpcError> {
    // The arity has been checked, so the index is in range
    T::deserialize(&params[idx]).map_err(|err| {
        RpcError::invalid_params(format!("Invalid parameter '{}'", name)).with_source(&err)
    })
}

// JSON does not tell integers and integral floats apart, so `1.0` counts as `1`.
fn game_result(code: f64) -> Result<GameResult, RpcError> {
    if code.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&code) {
        return Err(RpcError::invalid_params(format!(
            "Invalid game result {}",
            code
        )));
    }
    GameResult::try_from(code as u8).map_err(|err| RpcError::invalid_params(err.to_string()))
}

fn to_result<T: Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|err| {
        RpcError::new(INTERNAL_ERROR, "Could not serialize the result").with_source(&err)
    })
}

/// Handles a single serialized request.
///
/// Returns `None` for a notification that succeeded. Errors are always
/// answered, even for notifications. A panic inside the module is reported as
/// an internal error instead of being propagated.
pub fn handle_request<M: RpcModule>(module: &M, request_json: &str) -> Option<RpcResponse> {
    let value: Value = match serde_json::from_str(request_json) {
        Ok(value) => value,
        Err(err) => {
            let error = RpcError::new(PARSE_ERROR, "Parse error").with_source(&err);
            return Some(RpcResponse::new(Value::Null, RpcOutcome::Error(error)));
        }
    };
    let fallback_id = value.get("id").cloned().unwrap_or(Value::Null);
    let request: RpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(err) => {
            let error = RpcError::new(INVALID_REQUEST, "Invalid request").with_source(&err);
            return Some(RpcResponse::new(fallback_id, RpcOutcome::Error(error)));
        }
    };

    let RpcRequest {
        method, params, id, ..
    } = request;
    let id = id.filter(|id| !id.is_null());
    debug!(method = %method, notification = id.is_none(), "Handling request");

    let outcome = match catch_unwind(AssertUnwindSafe(|| module.call(&method, params))) {
        Ok(Ok(result)) => RpcOutcome::Result(result),
        Ok(Err(error)) => {
            debug!(method = %method, %error, "Request failed");
            RpcOutcome::Error(error)
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| String::from("unknown panic"));
            warn!(method = %method, panic = %message, "Internal error while handling request");
            RpcOutcome::Error(RpcError {
                code: INTERNAL_ERROR,
                message: String::from("Internal error"),
                data: Some(message),
            })
        }
    };

    match (id, outcome) {
        (None, RpcOutcome::Result(_)) => None,
        (id, outcome) => Some(RpcResponse::new(id.unwrap_or(Value::Null), outcome)),
    }
}

/// Answers requests, one JSON object per line, until the input is exhausted.
///
/// Responses are written one per line as well. Blank lines are skipped.
pub fn serve<M, R, W>(module: &M, input: R, mut output: W) -> anyhow::Result<()>
where
    M: RpcModule,
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        let request_json = line.trim();
        if request_json.is_empty() {
            continue;
        }
        trace!(request = %request_json, "Received request");
        if let Some(response) = handle_request(module, request_json) {
            let response_json = serde_json::to_string(&response)?;
            trace!(response = %response_json, "Sending response");
            writeln!(output, "{}", response_json)?;
            output.flush()?;
        }
    }
    Ok(())
}
