//! Flow ledger client
//!
//! Read-only Cadence scripts run directly against the access node REST API.
//! Transactions are handed to a wallet gateway that owns the signing keys
//! and returns the submitted transaction id; signing mechanics live entirely
//! outside this service.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::FlowConfig;
use crate::error::{AppError, AppResult};

/// Cadence script and transaction templates. `0xOracleContract` and
/// `0xInsurancePool` placeholders are substituted with configured addresses
/// before execution.
pub mod cadence {
    pub const GET_WEATHER_DATA: &str = r#"
import OracleContract from 0xOracleContract

access(all) fun main(locationId: String): [OracleContract.WeatherData]? {
  return OracleContract.getWeatherData(locationId: locationId)
}
"#;

    pub const GET_POOL_STATS: &str = r#"
import InsurancePool from 0xInsurancePool

access(all) fun main(): {String: AnyStruct} {
  return InsurancePool.getPoolStats()
}
"#;

    pub const GET_USER_POLICIES: &str = r#"
import InsurancePool from 0xInsurancePool

access(all) fun main(userAddress: Address): [InsurancePool.PolicyInfo] {
  return InsurancePool.getUserPolicies(userAddress: userAddress)
}
"#;

    pub const UPDATE_WEATHER_DATA: &str = r#"
import OracleContract from 0xOracleContract

transaction(
  locationId: String,
  rainfallMM: UFix64,
  temperatureCelsius: UFix64,
  humidity: UFix64,
  windSpeedKMH: UFix64,
  dataSource: String
) {
  let dataProvider: &OracleContract.DataProvider

  prepare(acct: auth(Storage) &Account) {
    self.dataProvider = acct.storage.borrow<&OracleContract.DataProvider>(
      from: OracleContract.DataProviderStoragePath
    ) ?? panic("Could not borrow data provider reference")
  }

  execute {
    let timestamp = UInt64(getCurrentBlock().timestamp)
    self.dataProvider.updateWeatherData(
      locationId: locationId,
      rainfallMM: rainfallMM,
      temperatureCelsius: temperatureCelsius,
      humidity: humidity,
      windSpeedKMH: windSpeedKMH,
      timestamp: timestamp,
      dataSource: dataSource
    )
  }
}
"#;

    pub const REGISTER_POLICY: &str = r#"
import InsurancePool from 0xInsurancePool

transaction(
  locationId: String,
  cropType: String,
  coverageAmount: UFix64,
  premiumAmount: UFix64
) {
  let poolRef: &InsurancePool.InsurancePool

  prepare(acct: auth(Storage) &Account) {
    self.poolRef = acct.storage.borrow<&InsurancePool.InsurancePool>(
      from: InsurancePool.InsurancePoolStoragePath
    ) ?? panic("Could not borrow insurance pool reference")
  }

  execute {
    self.poolRef.registerPolicy(
      locationId: locationId,
      cropType: cropType,
      coverageAmount: coverageAmount,
      premiumAmount: premiumAmount
    )
  }
}
"#;

    pub const CHECK_TRIGGERS: &str = r#"
import InsurancePool from 0xInsurancePool

transaction {
  let poolRef: &InsurancePool.InsurancePool

  prepare(acct: auth(Storage) &Account) {
    self.poolRef = acct.storage.borrow<&InsurancePool.InsurancePool>(
      from: InsurancePool.InsurancePoolStoragePath
    ) ?? panic("Could not borrow insurance pool reference")
  }

  execute {
    self.poolRef.checkTriggerConditions()
  }
}
"#;
}

/// A typed Cadence argument in JSON-CDC encoding
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CadenceArg {
    #[serde(rename = "type")]
    pub cadence_type: String,
    pub value: Value,
}

impl CadenceArg {
    pub fn string(value: &str) -> Self {
        Self {
            cadence_type: "String".to_string(),
            value: Value::String(value.to_string()),
        }
    }

    pub fn address(value: &str) -> Self {
        Self {
            cadence_type: "Address".to_string(),
            value: Value::String(value.to_string()),
        }
    }

    /// UFix64 values are transported as strings with two decimal places.
    pub fn ufix64(value: f64) -> Self {
        Self {
            cadence_type: "UFix64".to_string(),
            value: Value::String(format!("{:.2}", value)),
        }
    }

    pub fn ufix64_decimal(value: Decimal) -> Self {
        Self {
            cadence_type: "UFix64".to_string(),
            value: Value::String(format!("{:.2}", value.round_dp(2))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GatewayTxResponse {
    transaction_id: String,
}

/// Flow ledger client
#[derive(Clone)]
pub struct FlowClient {
    client: Client,
    access_node: String,
    gateway_url: String,
    oracle_address: String,
    pool_address: String,
}

impl FlowClient {
    pub fn new(config: &FlowConfig) -> Self {
        Self {
            client: Client::new(),
            access_node: config.access_node.clone(),
            gateway_url: config.gateway_url.clone(),
            oracle_address: config.oracle_address.clone(),
            pool_address: config.pool_address.clone(),
        }
    }

    /// Substitute contract address placeholders into a template.
    fn render(&self, template: &str) -> String {
        template
            .replace("0xOracleContract", &self.oracle_address)
            .replace("0xInsurancePool", &self.pool_address)
    }

    /// Execute a read-only Cadence script on the access node.
    ///
    /// The access node speaks base64 on both sides: script and arguments go
    /// up base64-encoded, the JSON-CDC result comes back the same way.
    pub async fn execute_script(&self, template: &str, args: Vec<CadenceArg>) -> AppResult<Value> {
        let url = format!("{}/v1/scripts", self.access_node);
        let arguments: Vec<String> = args
            .iter()
            .map(|arg| {
                serde_json::to_string(arg)
                    .map(|s| BASE64.encode(s))
                    .map_err(|e| AppError::Internal(e.to_string()))
            })
            .collect::<AppResult<_>>()?;

        let body = json!({
            "script": BASE64.encode(self.render(template)),
            "arguments": arguments,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Ledger(format!("script request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Ledger(format!(
                "script execution failed: {} - {}",
                status, text
            )));
        }

        let encoded: String = response
            .json()
            .await
            .map_err(|e| AppError::Ledger(format!("malformed script response: {}", e)))?;

        let raw = BASE64
            .decode(encoded.trim())
            .map_err(|e| AppError::Ledger(format!("script result not base64: {}", e)))?;
        let cdc: Value = serde_json::from_slice(&raw)
            .map_err(|e| AppError::Ledger(format!("script result not JSON-CDC: {}", e)))?;

        Ok(decode_cadence(&cdc))
    }

    /// Submit a transaction through the wallet gateway and return its id.
    pub async fn submit_transaction(
        &self,
        template: &str,
        args: Vec<CadenceArg>,
    ) -> AppResult<String> {
        let url = format!("{}/v1/transactions", self.gateway_url);
        let body = json!({
            "cadence": self.render(template),
            "arguments": args,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Ledger(format!("transaction submission failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Ledger(format!(
                "transaction rejected: {} - {}",
                status, text
            )));
        }

        let tx: GatewayTxResponse = response
            .json()
            .await
            .map_err(|e| AppError::Ledger(format!("malformed gateway response: {}", e)))?;

        Ok(tx.transaction_id)
    }
}

/// Convert a JSON-CDC value (`{"type": ..., "value": ...}`) into plain JSON.
///
/// Handles the container and scalar kinds the oracle and pool contracts
/// return; unknown kinds pass their value through untouched.
pub fn decode_cadence(cdc: &Value) -> Value {
    let Some(kind) = cdc.get("type").and_then(Value::as_str) else {
        return cdc.clone();
    };
    let value = cdc.get("value").unwrap_or(&Value::Null);

    match kind {
        "Optional" => {
            if value.is_null() {
                Value::Null
            } else {
                decode_cadence(value)
            }
        }
        "Array" => Value::Array(
            value
                .as_array()
                .map(|items| items.iter().map(decode_cadence).collect())
                .unwrap_or_default(),
        ),
        "Dictionary" => {
            let mut map = serde_json::Map::new();
            if let Some(entries) = value.as_array() {
                for entry in entries {
                    let key = entry
                        .get("key")
                        .map(decode_cadence)
                        .and_then(|k| k.as_str().map(str::to_string));
                    if let (Some(key), Some(val)) = (key, entry.get("value")) {
                        map.insert(key, decode_cadence(val));
                    }
                }
            }
            Value::Object(map)
        }
        "Struct" | "Resource" | "Event" => {
            let mut map = serde_json::Map::new();
            if let Some(fields) = value.get("fields").and_then(Value::as_array) {
                for field in fields {
                    let name = field.get("name").and_then(Value::as_str);
                    if let (Some(name), Some(val)) = (name, field.get("value")) {
                        map.insert(name.to_string(), decode_cadence(val));
                    }
                }
            }
            Value::Object(map)
        }
        "Bool" => value.clone(),
        "String" | "Address" | "UFix64" | "Fix64" => value.clone(),
        "UInt64" | "UInt32" | "UInt8" | "Int64" | "Int32" | "Int" | "UInt" => value
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or_else(|| value.clone()),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_ufix64_formatting() {
        assert_eq!(CadenceArg::ufix64(3.14159).value, json!("3.14"));
        assert_eq!(CadenceArg::ufix64(22.0).value, json!("22.00"));
        assert_eq!(
            CadenceArg::ufix64_decimal(Decimal::from_str("1.95").unwrap()).value,
            json!("1.95")
        );
        assert_eq!(
            CadenceArg::ufix64_decimal(Decimal::from(5000)).value,
            json!("5000.00")
        );
    }

    #[test]
    fn test_cadence_arg_serialization() {
        let arg = CadenceArg::string("station-1");
        let encoded = serde_json::to_value(&arg).unwrap();
        assert_eq!(encoded, json!({ "type": "String", "value": "station-1" }));
    }

    #[test]
    fn test_decode_scalar_kinds() {
        assert_eq!(
            decode_cadence(&json!({ "type": "UFix64", "value": "12.50" })),
            json!("12.50")
        );
        assert_eq!(
            decode_cadence(&json!({ "type": "UInt64", "value": "42" })),
            json!(42)
        );
        assert_eq!(
            decode_cadence(&json!({ "type": "Bool", "value": true })),
            json!(true)
        );
    }

    #[test]
    fn test_decode_optional() {
        assert_eq!(
            decode_cadence(&json!({ "type": "Optional", "value": null })),
            Value::Null
        );
        assert_eq!(
            decode_cadence(&json!({
                "type": "Optional",
                "value": { "type": "String", "value": "x" }
            })),
            json!("x")
        );
    }

    #[test]
    fn test_decode_dictionary_to_object() {
        let cdc = json!({
            "type": "Dictionary",
            "value": [
                {
                    "key": { "type": "String", "value": "totalPolicies" },
                    "value": { "type": "UInt64", "value": "7" }
                }
            ]
        });
        assert_eq!(decode_cadence(&cdc), json!({ "totalPolicies": 7 }));
    }

    #[test]
    fn test_decoded_pool_stats_deserialize() {
        // The full read path: JSON-CDC dictionary from the pool contract,
        // decoded, then deserialized into the shared read-model.
        let cdc = json!({
            "type": "Dictionary",
            "value": [
                {
                    "key": { "type": "String", "value": "totalLiquidity" },
                    "value": { "type": "UFix64", "value": "125000.50" }
                },
                {
                    "key": { "type": "String", "value": "totalPolicies" },
                    "value": { "type": "UInt64", "value": "42" }
                },
                {
                    "key": { "type": "String", "value": "totalPayouts" },
                    "value": { "type": "UFix64", "value": "8000.00" }
                },
                {
                    "key": { "type": "String", "value": "utilizationRate" },
                    "value": { "type": "UFix64", "value": "0.064" }
                }
            ]
        });

        let stats: shared::PoolStats = serde_json::from_value(decode_cadence(&cdc)).unwrap();
        assert_eq!(stats.total_policies, 42);
        assert_eq!(stats.utilization_rate, 0.064);
        assert_eq!(stats.total_liquidity, Decimal::from_str("125000.50").unwrap());
    }

    #[test]
    fn test_decode_struct_array() {
        let cdc = json!({
            "type": "Array",
            "value": [{
                "type": "Struct",
                "value": {
                    "id": "A.01.InsurancePool.PolicyInfo",
                    "fields": [
                        { "name": "policyId", "value": { "type": "String", "value": "p-1" } },
                        { "name": "isActive", "value": { "type": "Bool", "value": true } }
                    ]
                }
            }]
        });
        assert_eq!(
            decode_cadence(&cdc),
            json!([{ "policyId": "p-1", "isActive": true }])
        );
    }

    #[test]
    fn test_render_substitutes_addresses() {
        let client = FlowClient::new(&crate::config::FlowConfig {
            access_node: "http://localhost:8888".to_string(),
            gateway_url: "http://localhost:8701".to_string(),
            oracle_address: "0xabc".to_string(),
            pool_address: "0xdef".to_string(),
        });
        let rendered = client.render(cadence::GET_POOL_STATS);
        assert!(rendered.contains("import InsurancePool from 0xdef"));
        assert!(!rendered.contains("0xInsurancePool"));
    }
}
