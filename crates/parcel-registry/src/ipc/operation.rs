//! # Registry Operations
//!
//! Parses `(function, args)` invocations into the closed `Operation` enum.
//! Arity and value checks happen here, so the service only ever sees typed
//! requests.

use crate::domain::{Axis, RegistryError, SplitLine};
use crate::ports::{ChangeOwnerRequest, CreateLandRequest, ForkChild, ForkLandRequest};
use serde::{Deserialize, Serialize};

/// A function call as delivered by the transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(function: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Every supported registry function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    InitLedger,
    QueryLand { key: String },
    CreateLand(CreateLandRequest),
    QueryAllLands,
    ChangeLandOwner(ChangeOwnerRequest),
    Delete { key: String },
    ForkLand(ForkLandRequest),
    GetHistoryForLand { key: String },
}

impl Operation {
    /// Wire name of the operation.
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::InitLedger => "initLedger",
            Self::QueryLand { .. } => "queryLand",
            Self::CreateLand(_) => "createLand",
            Self::QueryAllLands => "queryAllLands",
            Self::ChangeLandOwner(_) => "changeLandOwner",
            Self::Delete { .. } => "delete",
            Self::ForkLand(_) => "forkLand",
            Self::GetHistoryForLand { .. } => "getHistoryForLand",
        }
    }

    pub fn parse(invocation: &Invocation) -> Result<Self, RegistryError> {
        let args = invocation.args.as_slice();
        match invocation.function.as_str() {
            "initLedger" => Ok(Self::InitLedger),
            "queryAllLands" => Ok(Self::QueryAllLands),
            "queryLand" => {
                let [key] = exact::<1>(args)?;
                Ok(Self::QueryLand { key })
            }
            "delete" => {
                let [key] = exact::<1>(args)?;
                Ok(Self::Delete { key })
            }
            "getHistoryForLand" => {
                let [key] = exact::<1>(args)?;
                Ok(Self::GetHistoryForLand { key })
            }
            "createLand" => {
                let [key, registry_name, extent, parent_id, owner] = exact::<5>(args)?;
                Ok(Self::CreateLand(CreateLandRequest {
                    key,
                    registry_name,
                    extent: non_negative(3, &extent)?,
                    parent_id,
                    owner,
                }))
            }
            "changeLandOwner" => {
                let [key, new_owner] = exact::<2>(args)?;
                Ok(Self::ChangeLandOwner(ChangeOwnerRequest { key, new_owner }))
            }
            "forkLand" => {
                let [parent_key, key1, owner1, size1, key2, owner2, size2, axis, x, y] =
                    exact::<10>(args)?;
                let first = ForkChild {
                    key: key1,
                    owner: owner1,
                    extent: non_negative(4, &size1)?,
                };
                let second = ForkChild {
                    key: key2,
                    owner: owner2,
                    extent: non_negative(7, &size2)?,
                };
                let x_divider = integer(9, &x)?;
                let y_divider = integer(10, &y)?;
                let axis = axis
                    .parse::<Axis>()
                    .map_err(|reason| RegistryError::invalid_argument(8, reason))?;
                Ok(Self::ForkLand(ForkLandRequest {
                    parent_key,
                    first,
                    second,
                    line: SplitLine {
                        axis,
                        x_divider,
                        y_divider,
                    },
                }))
            }
            other => Err(RegistryError::UnknownFunction {
                name: other.to_string(),
            }),
        }
    }
}

fn exact<const N: usize>(args: &[String]) -> Result<[String; N], RegistryError> {
    <[String; N]>::try_from(args.to_vec()).map_err(|given| RegistryError::ArgumentCount {
        expected: N,
        actual: given.len(),
    })
}

fn integer(position: usize, raw: &str) -> Result<i64, RegistryError> {
    raw.parse::<i64>().map_err(|_| {
        RegistryError::invalid_argument(position, format!("must be a numeric string, got {raw:?}"))
    })
}

fn non_negative(position: usize, raw: &str) -> Result<u64, RegistryError> {
    let value = integer(position, raw)?;
    u64::try_from(value).map_err(|_| {
        RegistryError::invalid_argument(position, format!("must not be negative, got {value}"))
    })
}
