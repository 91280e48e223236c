//! Translation seam between the batching engine and version-neutral callers.
//!
//! A [`VersionAdapter`] knows how to turn generic requests into one backend
//! version's native requests and how to turn native requests, responses and
//! errors back into the generic model. The hook wrappers below use it to
//! present engine callbacks to callers in generic terms.

use std::sync::Arc;

use bulk_processor_engine::{AfterFn, BeforeFn, BulkService};
use bulk_processor_shared::{
    BulkProcessorError, GenericBulkResponse, GenericBulkableAddRequest, GenericBulkableRequest,
    GenericError,
};

use crate::config::ElasticVersion;
use crate::parameters::{AfterFunc, BeforeFunc};

pub type NativeRequest<A> = <<A as VersionAdapter>::Service as BulkService>::Request;
pub type NativeResponse<A> = <<A as VersionAdapter>::Service as BulkService>::Response;
pub type NativeError<A> = <<A as VersionAdapter>::Service as BulkService>::Error;

/// Conversions between the generic model and one backend version.
///
/// Every conversion is total. Conversions back to the generic model must not
/// drop any native field that has a generic counterpart.
pub trait VersionAdapter: Clone + Send + Sync + 'static {
    /// The native bulk service this adapter translates for.
    type Service: BulkService;

    fn version(&self) -> ElasticVersion;

    /// Build the native request for a generic one.
    fn to_native_request(
        &self,
        request: GenericBulkableAddRequest,
    ) -> Result<NativeRequest<Self>, BulkProcessorError>;

    /// Generic view of a native batch, in the same order.
    fn to_generic_requests(&self, requests: &[NativeRequest<Self>]) -> Vec<GenericBulkableRequest>;

    /// Generic view of a native response. An absent response becomes a
    /// zero-valued one.
    fn to_generic_response(&self, response: Option<&NativeResponse<Self>>) -> GenericBulkResponse;

    fn to_generic_error(&self, error: &NativeError<Self>) -> GenericError;
}

/// Present a caller's before hook to the engine.
pub fn wrap_before<A: VersionAdapter>(adapter: A, before: BeforeFunc) -> BeforeFn<NativeRequest<A>> {
    Arc::new(move |execution_id: i64, requests: &[NativeRequest<A>]| {
        before(execution_id, &adapter.to_generic_requests(requests));
    })
}

/// Present a caller's after hook to the engine.
///
/// The response handed to the caller is always present; the error only when
/// the commit failed.
pub fn wrap_after<A: VersionAdapter>(
    adapter: A,
    after: AfterFunc,
) -> AfterFn<NativeRequest<A>, NativeResponse<A>, NativeError<A>> {
    Arc::new(
        move |execution_id: i64,
              requests: &[NativeRequest<A>],
              response: Option<&NativeResponse<A>>,
              error: Option<&NativeError<A>>| {
            let requests = adapter.to_generic_requests(requests);
            let response = adapter.to_generic_response(response);
            let error = error.map(|e| adapter.to_generic_error(e));
            after(execution_id, &requests, &response, error.as_ref());
        },
    )
}
