//! Uniform access to the header bag of in-flight messages.
//!
//! Filters work on whole requests, tests and downstream helpers often only
//! have a bare `HeaderMap` or request head. The carrier trait lets the filter
//! utility serve all of them.

use axum::http::{request, response, HeaderMap, Request, Response};

/// Something that owns a mutable header set.
pub trait HeaderCarrier {
    fn headers(&self) -> &HeaderMap;
    fn headers_mut(&mut self) -> &mut HeaderMap;
}

impl HeaderCarrier for HeaderMap {
    fn headers(&self) -> &HeaderMap {
        self
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self
    }
}

impl<B> HeaderCarrier for Request<B> {
    fn headers(&self) -> &HeaderMap {
        Request::headers(self)
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        Request::headers_mut(self)
    }
}

impl<B> HeaderCarrier for Response<B> {
    fn headers(&self) -> &HeaderMap {
        Response::headers(self)
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        Response::headers_mut(self)
    }
}

impl HeaderCarrier for request::Parts {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

impl HeaderCarrier for response::Parts {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}
