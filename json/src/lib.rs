//! JSON request front door: turns one blockchain-tagged JSON document into
//! either a serialized, signed transaction or a derived account address.
//!
//! No binary wraps this; embedding applications own the transport and call
//! [`process_request`] directly.

mod convert;

use convert::convert;
use log::debug;
use serde_json::{json, Map, Value as Json};
use wallet_core::{Blockchain, Error, Facade, NetType, Properties, Result, Transaction};

fn parse_blockchain(name: &str) -> Result<Blockchain> {
    match name {
        "bitcoin" => Ok(Blockchain::Bitcoin),
        "ethereum" => Ok(Blockchain::Ethereum),
        "eos" => Ok(Blockchain::Eos),
        "golos" => Ok(Blockchain::Golos),
        other => Err(Error::invalid_argument(format!("unknown blockchain '{other}'"))),
    }
}

fn object<'a>(doc: &'a Json, key: &str) -> Option<&'a Map<String, Json>> {
    doc.get(key).and_then(Json::as_object)
}

fn apply_properties(facade: &dyn Facade, net_type: NetType, props: &mut Properties, obj: &Map<String, Json>) -> Result<()> {
    for (name, json_value) in obj {
        let kind = props.kind_of(name).map_err(|_| Error::invalid_argument(format!("unknown property '{name}'")))?;
        let value = convert(facade, net_type, kind, name, json_value)?;
        props.set(name, value)?;
    }
    Ok(())
}

fn build_transaction(facade: &dyn Facade, net_type: NetType, transaction_doc: &Map<String, Json>, builder_doc: Option<&Map<String, Json>>) -> Result<String> {
    let mut transaction: Box<dyn Transaction> = facade.make_transaction(net_type)?;

    let sources = transaction_doc.get("sources").and_then(Json::as_array).map(Vec::as_slice).unwrap_or(&[]);
    for source in sources {
        let obj = source.as_object().ok_or_else(|| Error::invalid_argument("each source must be an object"))?;
        let index = transaction.add_source()?;
        apply_properties(facade, net_type, transaction.source(index)?, obj)?;
    }
    let destinations = transaction_doc.get("destinations").and_then(Json::as_array).map(Vec::as_slice).unwrap_or(&[]);
    for destination in destinations {
        let obj = destination.as_object().ok_or_else(|| Error::invalid_argument("each destination must be an object"))?;
        let index = transaction.add_destination()?;
        apply_properties(facade, net_type, transaction.destination(index)?, obj)?;
    }
    if let Some(fee) = transaction_doc.get("fee").and_then(Json::as_object) {
        apply_properties(facade, net_type, transaction.fee()?, fee)?;
    }
    if let Some(props) = transaction_doc.get("properties").and_then(Json::as_object) {
        apply_properties(facade, net_type, transaction.properties(), props)?;
    }

    if let Some(builder_doc) = builder_doc {
        let builder_type = builder_doc.get("type").and_then(Json::as_str).ok_or_else(|| Error::invalid_argument("builder.type is required"))?;
        let action = builder_doc.get("action").and_then(Json::as_str).unwrap_or("");
        let mut builder = facade.make_transaction_builder(net_type, builder_type, action)?;
        if let Some(payload) = builder_doc.get("payload").and_then(Json::as_object) {
            apply_properties(facade, net_type, builder.payload(), payload)?;
        }
        builder.build(transaction.as_mut())?;
    }

    debug!("encoding transaction for {}", facade.blockchain());
    facade.encode_serialized_transaction(transaction.as_mut())
}

/// Parses and executes one front-door request, returning its JSON response
/// as text. See the module documentation for the accepted request shape.
pub fn process_request(request: &str) -> Result<String> {
    let doc: Json = serde_json::from_str(request).map_err(|e| Error::invalid_argument(format!("invalid JSON: {e}")))?;
    let blockchain_name = doc.get("blockchain").and_then(Json::as_str).ok_or_else(|| Error::invalid_argument("missing 'blockchain'"))?;
    let blockchain = parse_blockchain(blockchain_name)?;
    let net_type: NetType = doc.get("net_type").and_then(Json::as_u64).unwrap_or(0) as NetType;
    let facade = wallet_registry::facade_for(blockchain)?;

    if let Some(transaction_doc) = object(&doc, "transaction") {
        let builder_doc = object(&doc, "builder");
        let serialized = build_transaction(facade, net_type, transaction_doc, builder_doc)?;
        return Ok(json!({ "transaction": { "serialized": serialized } }).to_string());
    }

    if let Some(account_doc) = object(&doc, "account") {
        let private_key = account_doc
            .get("private_key")
            .and_then(Json::as_str)
            .ok_or_else(|| Error::invalid_argument("account.private_key is required"))?;
        let account = facade.make_account(net_type, private_key.as_bytes())?;
        let address = account.address()?;
        return Ok(json!({ "account": { "address": address } }).to_string());
    }

    Err(Error::invalid_argument("request must contain 'transaction' or 'account'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_blockchain() {
        let err = process_request(r#"{"blockchain":"dogecoin"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_request_without_transaction_or_account() {
        let err = process_request(r#"{"blockchain":"bitcoin"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    // Compressed-pubkey WIF for private key 1, a standard test vector.
    const COMPRESSED_WIF: &str = "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn";

    #[test]
    fn derives_account_address_from_private_key() {
        let wif = COMPRESSED_WIF;
        let request = json!({
            "blockchain": "bitcoin",
            "net_type": 0,
            "account": { "private_key": wif }
        })
        .to_string();
        let response = process_request(&request).unwrap();
        assert!(response.contains("\"address\""));
    }

    #[test]
    fn builds_and_encodes_a_bitcoin_transaction() {
        let wif = COMPRESSED_WIF;
        let request = json!({
            "blockchain": "bitcoin",
            "net_type": 0,
            "transaction": {
                "sources": [{
                    "private_key": wif,
                    "prev_tx_hash": "00".repeat(32),
                    "prev_tx_out_index": 0,
                    "prev_tx_out_script_pubkey": "76a914000000000000000000000000000000000000000088ac",
                    "amount": 100000
                }],
                "destinations": [{ "address": "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2", "amount": 90000 }],
                "fee": { "amount_per_byte": 1 }
            }
        })
        .to_string();
        let result = process_request(&request);
        assert!(result.is_ok(), "unexpected error: {result:?}");
        let response = result.unwrap();
        assert!(response.contains("\"serialized\""));
    }
}
