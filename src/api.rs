//! Endpoint table.
//!
//! A flat mapping from service operations to `(path, payload, method)`
//! triples, issued through a shared [`RequestGateway`]. All caching and
//! coalescing behaviour comes from the gateway; nothing here adds to it.

use serde_json::{Value, json};

use crate::gateway::{RequestGateway, ResponseFuture};
use crate::types::{Method, Request};

/// One named endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub path: &'static str,
    pub method: Method,
}

pub const TOP_BAR: Endpoint = Endpoint {
    name: "top_bar",
    path: "/user/getBanner",
    method: Method::Get,
};

pub const HOME_LIST: Endpoint = Endpoint {
    name: "home_list",
    path: "/user/getHomeList",
    method: Method::Get,
};

pub const LOGIN: Endpoint = Endpoint {
    name: "login",
    path: "/login",
    method: Method::Post,
};

pub const USER_INFO: Endpoint = Endpoint {
    name: "user_info",
    path: "/getUserInfo",
    method: Method::Get,
};

pub const PLAY_LIST: Endpoint = Endpoint {
    name: "play_list",
    path: "/detail/project",
    method: Method::Get,
};

pub const PROJECT: Endpoint = Endpoint {
    name: "project",
    path: "/project/info",
    method: Method::Get,
};

pub const LIKE_LIST: Endpoint = Endpoint {
    name: "like_list",
    path: "/like/list",
    method: Method::Get,
};

/// Every known endpoint, in declaration order.
pub const ENDPOINTS: &[Endpoint] = &[
    TOP_BAR, HOME_LIST, LOGIN, USER_INFO, PLAY_LIST, PROJECT, LIKE_LIST,
];

impl Endpoint {
    /// Look up an endpoint by name.
    pub fn by_name(name: &str) -> Option<Endpoint> {
        ENDPOINTS.iter().copied().find(|e| e.name == name)
    }

    /// Build a request for this endpoint with the method's default cache
    /// preference.
    pub fn request(&self, payload: Value) -> Request {
        Request::new(self.method, self.path).payload(payload)
    }
}

/// Typed access to the service endpoints.
#[derive(Clone)]
pub struct Api {
    gateway: RequestGateway,
}

impl Api {
    pub fn new(gateway: RequestGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &RequestGateway {
        &self.gateway
    }

    pub fn get_top_bar(&self) -> ResponseFuture {
        self.call(TOP_BAR, json!({}))
    }

    pub fn get_home_list(&self) -> ResponseFuture {
        self.call(HOME_LIST, json!({}))
    }

    /// Exchange a login code for a session; never cached.
    pub fn user_login(&self, code: &str) -> ResponseFuture {
        self.call(LOGIN, json!({ "code": code }))
    }

    pub fn get_user_info(&self) -> ResponseFuture {
        self.call(USER_INFO, json!({}))
    }

    pub fn get_play_list(&self) -> ResponseFuture {
        self.call(PLAY_LIST, json!({}))
    }

    pub fn get_project(&self, id: impl Into<Value>) -> ResponseFuture {
        self.call(PROJECT, json!({ "id": id.into() }))
    }

    pub fn get_like_list(&self) -> ResponseFuture {
        self.call(LIKE_LIST, json!({}))
    }

    fn call(&self, endpoint: Endpoint, payload: Value) -> ResponseFuture {
        self.gateway.issue(endpoint.request(payload))
    }
}
