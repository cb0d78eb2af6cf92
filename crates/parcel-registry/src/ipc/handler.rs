//! # Invocation Handler
//!
//! Routes parsed operations to a `ParcelRegistryApi` and encodes results.

use crate::domain::RegistryError;
use crate::ipc::operation::{Invocation, Operation};
use crate::ipc::payloads::{HistoryRecord, QueryResult, Response};
use crate::ports::ParcelRegistryApi;
use tracing::{debug, instrument};

pub struct RegistryHandler<A: ParcelRegistryApi> {
    api: A,
}

impl<A: ParcelRegistryApi> RegistryHandler<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Parse and execute one invocation.
    #[instrument(skip(self, invocation), fields(function = %invocation.function))]
    pub fn handle(&self, invocation: &Invocation) -> Response {
        match Operation::parse(invocation).and_then(|op| self.execute(op)) {
            Ok(payload) => Response::success(payload),
            Err(err) => {
                debug!(error = %err, "Invocation failed");
                Response::error(&err)
            }
        }
    }

    /// Execute a typed operation, returning the success payload.
    pub fn execute(&self, operation: Operation) -> Result<Vec<u8>, RegistryError> {
        match operation {
            Operation::InitLedger => self.api.init_ledger().map(|()| Vec::new()),
            Operation::QueryLand { key } => Ok(self.api.query_land(&key)?.unwrap_or_default()),
            Operation::CreateLand(request) => self.api.create_land(request).map(|()| Vec::new()),
            Operation::QueryAllLands => {
                let results = self
                    .api
                    .query_all_lands()?
                    .iter()
                    .map(QueryResult::from_record)
                    .collect::<Result<Vec<_>, _>>()?;
                encode(&results)
            }
            Operation::ChangeLandOwner(request) => {
                self.api.change_land_owner(request).map(|()| Vec::new())
            }
            Operation::Delete { key } => self.api.delete_land(&key).map(|()| Vec::new()),
            Operation::ForkLand(request) => self.api.fork_land(request).map(|()| Vec::new()),
            Operation::GetHistoryForLand { key } => {
                let records = self
                    .api
                    .history_for_land(&key)?
                    .iter()
                    .map(|entry| HistoryRecord::from_entry(&key, entry))
                    .collect::<Result<Vec<_>, _>>()?;
                encode(&records)
            }
        }
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, RegistryError> {
    serde_json::to_vec(value).map_err(|e| RegistryError::Encoding {
        what: "response payload",
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_encode_failure_is_an_encoding_error() {
        let mut unencodable = BTreeMap::new();
        unencodable.insert((1u8, 2u8), "tuple keys are not JSON object keys");

        let err = encode(&unencodable).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Encoding {
                what: "response payload",
                ..
            }
        ));
    }
}
