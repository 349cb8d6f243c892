//! Per-item request dispatch.

use crate::classify::classify;
use crate::request::OutboundRequest;
use crate::result::{NormalizedResult, Outcome};
use crate::transport::HttpTransport;
use carsxe_catalog::{CatalogVariant, OperationCatalog, OperationSpec};
use carsxe_core::config::{DEFAULT_BASE_URL, DEFAULT_SOURCE};
use carsxe_core::{
    ApiKey, CarsxeConfig, Error, JsonItem, OPERATION_PARAM, ParameterSource, RESOURCE_PARAM,
    Result,
};
use carsxe_telemetry::{ApiCallSpanAttributes, safe_serialize, trace_api_call};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// VIN used to check that an API key is accepted.
pub const SAMPLE_VIN: &str = "WBAFR7C57CC811956";

/// What happens when an item fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The first failure aborts the run.
    #[default]
    Strict,
    /// Failures become error records and the run continues.
    ContinueOnFail,
}

impl FailurePolicy {
    pub fn from_flag(continue_on_fail: bool) -> Self {
        if continue_on_fail {
            FailurePolicy::ContinueOnFail
        } else {
            FailurePolicy::Strict
        }
    }
}

/// Builds, sends and classifies one request per input item.
///
/// Items are processed strictly in order, one outstanding call at a time.
///
/// # Example
///
/// ```no_run
/// use carsxe_catalog::VehicleQuery;
/// use carsxe_core::ApiKey;
/// use carsxe_dispatch::{Dispatcher, ReqwestTransport};
/// use std::sync::Arc;
///
/// # async fn example() -> carsxe_core::Result<()> {
/// let dispatcher = Dispatcher::new(Arc::new(ReqwestTransport::new()), ApiKey::new("my-key")?);
/// let results = dispatcher.run(&[VehicleQuery::recalls("1C4JJXR64PW696340")]).await?;
/// println!("{}", results[0].to_output());
/// # Ok(())
/// # }
/// ```
pub struct Dispatcher {
    catalog: OperationCatalog,
    transport: Arc<dyn HttpTransport>,
    api_key: ApiKey,
    base_url: String,
    source: String,
    policy: FailurePolicy,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn HttpTransport>, api_key: ApiKey) -> Self {
        Self {
            catalog: OperationCatalog::default(),
            transport,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            source: DEFAULT_SOURCE.to_string(),
            policy: FailurePolicy::default(),
        }
    }

    /// Dispatcher configured from a loaded [`CarsxeConfig`].
    pub fn from_config(config: &CarsxeConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self::new(transport, config.api_key()?)
            .with_base_url(&config.api.base_url)
            .with_source(&config.api.source)
            .with_variant(CatalogVariant::from(config.dispatch.variant))
            .with_policy(FailurePolicy::from_flag(config.dispatch.continue_on_fail)))
    }

    pub fn with_variant(mut self, variant: CatalogVariant) -> Self {
        self.catalog = OperationCatalog::new(variant);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Validate `item` against `spec` and build the outbound request.
    pub fn build_request(
        &self,
        spec: &OperationSpec,
        item: &dyn ParameterSource,
    ) -> Result<OutboundRequest> {
        let fields = spec.resolve(item)?;
        Ok(OutboundRequest::build(
            spec,
            fields,
            &self.api_key,
            &self.source,
            &self.base_url,
        ))
    }

    /// Process `items` in order, producing one result per item.
    ///
    /// Under [`FailurePolicy::Strict`] the first failed item aborts the run
    /// with [`Error::ItemFailed`]; under [`FailurePolicy::ContinueOnFail`]
    /// every item yields a result and this never returns an error.
    pub async fn run<I: ParameterSource>(&self, items: &[I]) -> Result<Vec<NormalizedResult>> {
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, items = items.len(), policy = ?self.policy, "Starting CarsXE run");

        let mut results = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let result = self.process(&run_id, index, item).await;

            if result.is_failure() {
                match self.policy {
                    FailurePolicy::Strict => {
                        error!(run_id = %run_id, index, "Aborting run: {}", result.failure_message());
                        return Err(result.into_error());
                    }
                    FailurePolicy::ContinueOnFail => {
                        warn!(run_id = %run_id, index, "Item failed, continuing: {}", result.failure_message());
                        debug!("Error record: {}", safe_serialize(&result.error_record()));
                    }
                }
            }

            results.push(result);
        }

        info!(run_id = %run_id, "CarsXE run complete");
        Ok(results)
    }

    /// [`Dispatcher::run`], rendered as host output records.
    pub async fn run_outputs<I: ParameterSource>(&self, items: &[I]) -> Result<Vec<Value>> {
        let results = self.run(items).await?;
        Ok(results.iter().map(NormalizedResult::to_output).collect())
    }

    /// Process a single item without applying the failure policy.
    pub async fn dispatch_item(&self, index: usize, item: &dyn ParameterSource) -> NormalizedResult {
        self.process("single", index, item).await
    }

    /// Check the API key with a sample VIN decode.
    pub async fn verify_credentials(&self) -> Result<()> {
        let item = JsonItem::default()
            .with(OPERATION_PARAM, "specs")
            .with("vin", SAMPLE_VIN);
        let result = self.dispatch_item(0, &item).await;

        if result.is_success() {
            info!("CarsXE API key verified");
            Ok(())
        } else {
            Err(result.into_error())
        }
    }

    #[instrument(skip(self, item))]
    async fn process(&self, run_id: &str, index: usize, item: &dyn ParameterSource) -> NormalizedResult {
        let resource = item
            .string_parameter(RESOURCE_PARAM)
            .filter(|r| !r.is_empty());
        let operation = item.string_parameter(OPERATION_PARAM);

        let outcome = match self.prepare(resource.as_deref(), operation.as_deref(), item) {
            Ok((spec, request)) => {
                debug!("Dispatching {}", request.redacted());
                let outcome = classify(self.transport.send(&request).await);

                trace_api_call(ApiCallSpanAttributes {
                    run_id: run_id.to_string(),
                    item_index: index,
                    operation: spec.key().to_string(),
                    resource: spec.resource().key().to_string(),
                    method: request.method.to_string(),
                    path: request.path.clone(),
                    status_code: outcome.status_code(),
                    outcome: outcome.label().to_string(),
                });

                outcome
            }
            Err(err) => {
                debug!("Item {} rejected before dispatch: {}", index, err);
                Outcome::ConfigurationError {
                    message: err.to_string(),
                }
            }
        };

        NormalizedResult {
            index,
            resource: resource.or_else(|| {
                operation
                    .as_deref()
                    .and_then(|op| self.catalog.lookup(None, op).ok())
                    .map(|spec| spec.resource().key().to_string())
            }),
            operation,
            timestamp: Utc::now(),
            outcome,
        }
    }

    fn prepare(
        &self,
        resource: Option<&str>,
        operation: Option<&str>,
        item: &dyn ParameterSource,
    ) -> Result<(&OperationSpec, OutboundRequest)> {
        let operation =
            operation.ok_or_else(|| Error::MissingParameter(OPERATION_PARAM.to_string()))?;
        let spec = self.catalog.lookup(resource, operation)?;
        let request = self.build_request(spec, item)?;
        Ok((spec, request))
    }
}
