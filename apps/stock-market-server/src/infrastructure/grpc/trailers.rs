//! Trace-id trailer layer.
//!
//! Handlers can only set response headers on success, so the trace id chosen
//! by the interceptor chain is copied from the response headers into the
//! final trailers frame by this tower layer. Statuses that already carry the
//! id (failures) are left alone.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::TryFutureExt;
use futures::future::MapOk;
use http_body::{Body, Frame, SizeHint};
use tonic::codegen::http::{HeaderValue, Request, Response};
use tower::{Layer, Service};

use super::interceptors::TRACE_ID_HEADER;

/// Layer that mirrors the `x-trace-id` response header into the trailers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceTrailerLayer;

impl<S> Layer<S> for TraceTrailerLayer {
    type Service = TraceTrailer<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceTrailer { inner }
    }
}

/// Service produced by [`TraceTrailerLayer`].
#[derive(Debug, Clone)]
pub struct TraceTrailer<S> {
    inner: S,
}

type WrapFn<B> = fn(Response<B>) -> Response<TraceTrailerBody<B>>;

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for TraceTrailer<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = Response<TraceTrailerBody<ResBody>>;
    type Error = S::Error;
    type Future = MapOk<S::Future, WrapFn<ResBody>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        self.inner
            .call(request)
            .map_ok(TraceTrailerBody::wrap as WrapFn<ResBody>)
    }
}

/// Response body that appends the trace id to its trailers frame.
pub struct TraceTrailerBody<B> {
    inner: Pin<Box<B>>,
    trace_id: Option<HeaderValue>,
}

impl<B> TraceTrailerBody<B> {
    /// Wrap `body`, mirroring `trace_id` into its trailers.
    pub fn new(body: B, trace_id: Option<HeaderValue>) -> Self {
        Self {
            inner: Box::pin(body),
            trace_id,
        }
    }

    fn wrap(response: Response<B>) -> Response<Self> {
        let trace_id = response.headers().get(TRACE_ID_HEADER).cloned();
        response.map(|body| Self::new(body, trace_id))
    }
}

impl<B> std::fmt::Debug for TraceTrailerBody<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceTrailerBody")
            .field("trace_id", &self.trace_id)
            .finish_non_exhaustive()
    }
}

impl<B: Body> Body for TraceTrailerBody<B> {
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = &mut *self;
        match this.inner.as_mut().poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => {
                let frame = match frame.into_trailers() {
                    Ok(mut trailers) => {
                        if let Some(trace_id) = this.trace_id.take() {
                            trailers.entry(TRACE_ID_HEADER).or_insert(trace_id);
                        }
                        Frame::trailers(trailers)
                    }
                    Err(frame) => frame,
                };
                Poll::Ready(Some(Ok(frame)))
            }
            other => other,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::convert::Infallible;

    use futures::future::poll_fn;
    use tonic::codegen::Bytes;
    use tonic::codegen::http::HeaderMap;
    use tower::ServiceExt;

    use super::*;

    /// Body replaying a fixed list of frames.
    struct Frames(VecDeque<Frame<Bytes>>);

    impl Frames {
        fn grpc_ok(status_trailers: HeaderMap) -> Self {
            Self(VecDeque::from([
                Frame::data(Bytes::from_static(b"\0\0\0\0\0")),
                Frame::trailers(status_trailers),
            ]))
        }
    }

    impl Body for Frames {
        type Data = Bytes;
        type Error = Infallible;

        fn poll_frame(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, Infallible>>> {
            Poll::Ready(self.0.pop_front().map(Ok))
        }
    }

    fn status_ok() -> HeaderMap {
        let mut trailers = HeaderMap::new();
        trailers.insert("grpc-status", HeaderValue::from_static("0"));
        trailers
    }

    async fn drain<B: Body + Unpin>(mut body: B) -> (usize, Option<HeaderMap>) {
        let mut data_frames = 0;
        let mut trailers = None;
        while let Some(frame) = poll_fn(|cx| Pin::new(&mut body).poll_frame(cx)).await {
            let Ok(frame) = frame else { panic!("body failed") };
            match frame.into_trailers() {
                Ok(map) => trailers = Some(map),
                Err(_) => data_frames += 1,
            }
        }
        (data_frames, trailers)
    }

    #[tokio::test]
    async fn trace_id_is_appended_to_trailers() {
        let body = TraceTrailerBody::new(
            Frames::grpc_ok(status_ok()),
            Some(HeaderValue::from_static("trace-9")),
        );

        let (data_frames, trailers) = drain(body).await;
        let trailers = trailers.unwrap();

        assert_eq!(data_frames, 1);
        assert_eq!(trailers.get("grpc-status").unwrap(), "0");
        assert_eq!(trailers.get(TRACE_ID_HEADER).unwrap(), "trace-9");
    }

    #[tokio::test]
    async fn existing_trailer_is_not_overwritten() {
        let mut trailers = status_ok();
        trailers.insert(TRACE_ID_HEADER, HeaderValue::from_static("from-status"));
        let body = TraceTrailerBody::new(
            Frames::grpc_ok(trailers),
            Some(HeaderValue::from_static("from-headers")),
        );

        let (_, trailers) = drain(body).await;
        let trailers = trailers.unwrap();

        assert_eq!(trailers.get_all(TRACE_ID_HEADER).iter().count(), 1);
        assert_eq!(trailers.get(TRACE_ID_HEADER).unwrap(), "from-status");
    }

    #[tokio::test]
    async fn layer_reads_trace_id_from_response_headers() {
        let inner = tower::service_fn(|_request: Request<()>| async {
            let response = Response::builder()
                .header(TRACE_ID_HEADER, "header-trace")
                .body(Frames::grpc_ok(status_ok()))
                .unwrap();
            Ok::<_, Infallible>(response)
        });

        let response = TraceTrailerLayer
            .layer(inner)
            .oneshot(Request::new(()))
            .await
            .unwrap();

        let (_, trailers) = drain(response.into_body()).await;
        assert_eq!(
            trailers.unwrap().get(TRACE_ID_HEADER).unwrap(),
            "header-trace"
        );
    }

    #[tokio::test]
    async fn response_without_trace_id_is_untouched() {
        let body = TraceTrailerBody::new(Frames::grpc_ok(status_ok()), None);

        let (_, trailers) = drain(body).await;
        let trailers = trailers.unwrap();

        assert!(trailers.get(TRACE_ID_HEADER).is_none());
        assert_eq!(trailers.len(), 1);
    }
}
