//! Block-explorer client for contract metadata
//!
//! Talks to a Blockscout-compatible v2 REST API to resolve verified contract
//! source code, compiler details, and ABIs by address.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::model::ContractMetadata;

const UNKNOWN_CONTRACT_NAME: &str = "Unknown Contract";
const UNKNOWN_COMPILER: &str = "Unknown";

#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// Transport-level failure talking to the explorer
    #[error("Explorer request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the explorer
    #[error("Explorer returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    /// The address exists but does not hold contract code
    #[error("Address {0} is not a contract")]
    NotAContract(String),

    /// Contract ABI not found or contract not verified
    #[error("Contract ABI not available for {0}")]
    AbiUnavailable(String),
}

/// Address detail subset returned by `/addresses/{address}`
#[derive(Debug, Deserialize)]
struct AddressDetail {
    #[serde(default)]
    is_contract: bool,
    name: Option<String>,
}

/// Smart-contract detail subset returned by `/smart-contracts/{address}`
#[derive(Debug, Default, Deserialize)]
struct SmartContractDetail {
    name: Option<String>,
    compiler_version: Option<String>,
    #[serde(default)]
    optimization_enabled: bool,
    source_code: Option<String>,
    abi: Option<serde_json::Value>,
    constructor_args: Option<String>,
    #[serde(default)]
    is_verified: bool,
}

/// Client for a Blockscout-compatible explorer API
#[derive(Clone)]
pub struct ExplorerClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ExplorerClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch contract source code and metadata by address.
    ///
    /// A missing smart-contract detail record degrades to address-level
    /// metadata with empty source, matching the explorer's behavior for
    /// unverified contracts.
    pub async fn contract_info(&self, address: &str) -> Result<ContractMetadata, ExplorerError> {
        let address = address.to_lowercase();

        let detail: AddressDetail = self.get_json(&format!("addresses/{address}")).await?;
        if !detail.is_contract {
            return Err(ExplorerError::NotAContract(address));
        }

        let contract = match self
            .get_json::<SmartContractDetail>(&format!("smart-contracts/{address}"))
            .await
        {
            Ok(contract) => contract,
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Could not fetch contract source");
                SmartContractDetail::default()
            }
        };

        Ok(build_metadata(address, detail, contract))
    }

    /// Check whether an address holds contract code
    pub async fn is_contract(&self, address: &str) -> Result<bool, ExplorerError> {
        let address = address.to_lowercase();
        let detail: AddressDetail = self.get_json(&format!("addresses/{address}")).await?;
        Ok(detail.is_contract)
    }

    /// Fetch the ABI of a verified contract
    pub async fn contract_abi(&self, address: &str) -> Result<serde_json::Value, ExplorerError> {
        let address = address.to_lowercase();
        let contract: SmartContractDetail = self
            .get_json(&format!("smart-contracts/{address}"))
            .await?;

        contract
            .abi
            .ok_or(ExplorerError::AbiUnavailable(address))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ExplorerError> {
        let url = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path);

        tracing::debug!(url = %url, "Fetching from explorer");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

/// Merge address-level and contract-level detail into one metadata record
fn build_metadata(
    address: String,
    detail: AddressDetail,
    contract: SmartContractDetail,
) -> ContractMetadata {
    let compiler = contract
        .compiler_version
        .unwrap_or_else(|| UNKNOWN_COMPILER.to_string());

    ContractMetadata {
        address,
        name: contract
            .name
            .or(detail.name)
            .unwrap_or_else(|| UNKNOWN_CONTRACT_NAME.to_string()),
        version: compiler.clone(),
        compiler,
        optimization: contract.optimization_enabled,
        source_code: contract.source_code.unwrap_or_default(),
        abi: contract.abi.unwrap_or_else(|| serde_json::json!([])),
        constructor_args: contract.constructor_args,
        verified: contract.is_verified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_metadata_prefers_contract_level_name() {
        let detail = AddressDetail {
            is_contract: true,
            name: Some("Proxy".to_string()),
        };
        let contract = SmartContractDetail {
            name: Some("DuckVault".to_string()),
            compiler_version: Some("v0.8.19".to_string()),
            optimization_enabled: true,
            source_code: Some("contract DuckVault {}".to_string()),
            abi: Some(serde_json::json!([])),
            constructor_args: None,
            is_verified: true,
        };

        let metadata = build_metadata("0xabc".to_string(), detail, contract);

        assert_eq!(metadata.name, "DuckVault");
        assert_eq!(metadata.compiler, "v0.8.19");
        assert!(metadata.verified);
    }

    #[test]
    fn test_build_metadata_degrades_without_contract_detail() {
        let detail = AddressDetail {
            is_contract: true,
            name: None,
        };

        let metadata = build_metadata("0xabc".to_string(), detail, SmartContractDetail::default());

        assert_eq!(metadata.name, "Unknown Contract");
        assert_eq!(metadata.compiler, "Unknown");
        assert!(metadata.source_code.is_empty());
        assert!(!metadata.verified);
    }

    #[test]
    fn test_smart_contract_detail_deserializes_explorer_payload() {
        let payload = r#"{
            "name": "Token",
            "compiler_version": "v0.8.19+commit.7dd6d404",
            "optimization_enabled": true,
            "source_code": "contract Token {}",
            "abi": [{"type": "function", "name": "transfer"}],
            "is_verified": true
        }"#;

        let contract: SmartContractDetail = serde_json::from_str(payload).unwrap();

        assert_eq!(contract.name.as_deref(), Some("Token"));
        assert!(contract.is_verified);
    }
}
