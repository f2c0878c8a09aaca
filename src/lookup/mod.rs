use std::collections::HashSet;
use std::str;

use bitcoin::Txid;
use bitcoin::script::Script;
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::script::protocol::TokenProtocol;
use crate::script::pushdrop::{self, DecodedOutput};
use crate::storage::TokenStore;

pub mod types;

use types::{LookupQuery, OutputRef, TokenRecord};

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Topics this instance is subscribed to; outputs on other topics are ignored
    #[serde(default)]
    pub topics: Vec<String>,

    /// Token protocol revision governing field interpretation
    #[serde(default)]
    pub protocol: TokenProtocol,
}

/// Maintains the live-token index and serves queries against it, scoped to the
/// subscribed topics. Stateless across calls: every durable fact lives in the
/// [`TokenStore`], so the service can be shared freely between concurrent callers.
pub struct TokenLookupService<S> {
    store: S,
    topics: HashSet<String>,
    protocol: TokenProtocol,
}

impl<S: TokenStore> TokenLookupService<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self {
            store,
            topics: config.topics.into_iter().collect(),
            protocol: config.protocol,
        }
    }

    /// Handle a new output reported by the notification source.
    ///
    /// Outputs on unsubscribed topics are ignored (a no-op, not an error). For
    /// subscribed topics the script must decode against the pushdrop template and
    /// carry a base-10 amount in the protocol's amount field; the resulting record
    /// is upserted under `(txid, vout)`.
    pub async fn output_added(
        &self,
        txid: Txid,
        vout: u32,
        output_script: &Script,
        topic: &str,
    ) -> Result<(), Error> {
        if !self.topics.contains(topic) {
            debug!(%txid, vout, topic, "ignoring output for unsubscribed topic");
            return Ok(());
        }

        let decoded = pushdrop::decode(output_script)?;
        let amount = self.parse_amount(&decoded)?;

        debug!(%txid, vout, amount, "indexing token output");

        self.store
            .store_record(TokenRecord {
                outpoint: OutputRef::new(txid, vout),
                amount,
                owner_key: decoded.locking_key.to_bytes(),
            })
            .await?;

        Ok(())
    }

    /// Drop the record for a spent output. Deleting an output that was never
    /// indexed (or was already spent) is a no-op, so replayed notifications are
    /// harmless.
    pub async fn output_spent(&self, txid: Txid, vout: u32, topic: &str) -> Result<(), Error> {
        if !self.topics.contains(topic) {
            debug!(%txid, vout, topic, "ignoring spend for unsubscribed topic");
            return Ok(());
        }

        debug!(%txid, vout, "removing spent token output");

        self.store.delete_record(&OutputRef::new(txid, vout)).await?;

        Ok(())
    }

    /// Answer a query against the live index.
    ///
    /// A query selecting both `txid` and `vout` returns the matching record, or
    /// nothing if the output is not live (not an error). `find_all` returns every
    /// live record. Anything else is rejected.
    pub async fn lookup(&self, query: Option<LookupQuery>) -> Result<Vec<TokenRecord>, Error> {
        let query = query.ok_or(Error::InvalidQuery)?;

        if let (Some(txid), Some(vout)) = (query.txid, query.vout) {
            let found = self
                .store
                .find_by_outpoint(&OutputRef::new(txid, vout))
                .await?;

            Ok(found.into_iter().collect())
        } else if query.find_all {
            Ok(self.store.find_all().await?)
        } else {
            Err(Error::InsufficientQueryParameters)
        }
    }

    fn parse_amount(&self, decoded: &DecodedOutput) -> Result<u64, Error> {
        let index = self.protocol.amount_field();

        let field = decoded.fields.get(index).ok_or_else(|| {
            Error::InvalidTokenData(format!("missing amount field at index {index}"))
        })?;

        let text = str::from_utf8(field)
            .map_err(|_| Error::InvalidTokenData("amount field is not utf-8".to_string()))?;

        text.parse().map_err(|_| {
            Error::InvalidTokenData(format!("amount field is not a base-10 integer: {text:?}"))
        })
    }
}
