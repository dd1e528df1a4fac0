//! Asynchronous FortiOS CMDB client implementation.

use crate::api::CmdbApi;
use crate::models::MovePosition;
use crate::tables::CmdbTable;
use crate::Result;
use async_trait::async_trait;
use fortigate_core::client::ClientConfig;
use fortigate_core::config::{Credentials, FortiGateConfig};
use fortigate_core::query::QueryParams;
use fortigate_core::Error;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};
use url::Url;

const USER_AGENT: &str = concat!("fortigate-cmdb/", env!("CARGO_PKG_VERSION"));

/// Cookie carrying the session CSRF token. Newer firmware appends the admin
/// port to the name (`ccsrftoken_443_...`).
const CSRF_COOKIE_PREFIX: &str = "ccsrftoken";

/// Header the CSRF token is echoed back in.
const CSRF_HEADER: &str = "X-CSRFTOKEN";

/// Builder for [`CmdbClient`].
#[derive(Debug, Clone)]
pub struct CmdbClientBuilder {
    config: FortiGateConfig,
    http: ClientConfig,
}

impl CmdbClientBuilder {
    /// Create a builder from a validated device configuration.
    #[must_use]
    pub fn new(config: FortiGateConfig) -> Self {
        let http = config.client_config().with_user_agent(USER_AGENT);
        Self { config, http }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http = config;
        self
    }

    /// Build the client and open a session.
    ///
    /// Password credentials log in through `/logincheck`; API tokens are
    /// attached to every request and need no login.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unusable configuration,
    /// [`Error::Authentication`] when the device rejects the login, or a
    /// transport error when it cannot be reached.
    pub async fn connect(self) -> Result<CmdbClient> {
        self.config.validate_config()?;
        let base_url = self.config.base_url()?;
        let http = self.http.build_http_client()?;

        let auth = match &self.config.credentials {
            Credentials::ApiToken(token) => {
                debug!(host = %self.config.host, "using API token authentication");
                Auth::Token(token.clone())
            }
            Credentials::Password { username, password } => {
                let csrf_token = login(&http, &base_url, username, password).await?;
                info!(host = %self.config.host, %username, "logged in to FortiGate");
                Auth::Session {
                    username: username.clone(),
                    password: password.clone(),
                    csrf_token: Arc::new(RwLock::new(SecretString::from(csrf_token))),
                }
            }
        };

        Ok(CmdbClient {
            http,
            base_url,
            vdom: self.config.vdom,
            auth,
        })
    }
}

/// How requests are authorized. Clones of a session client share the CSRF
/// token, so a renewal made by one is seen by all.
#[derive(Clone)]
enum Auth {
    Session {
        username: String,
        password: SecretString,
        csrf_token: Arc<RwLock<SecretString>>,
    },
    Token(SecretString),
}

/// Asynchronous FortiOS CMDB client bound to one device and VDOM.
#[derive(Clone)]
pub struct CmdbClient {
    http: reqwest::Client,
    base_url: Url,
    vdom: String,
    auth: Auth,
}

impl std::fmt::Debug for CmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmdbClient")
            .field("base_url", &self.base_url.as_str())
            .field("vdom", &self.vdom)
            .finish_non_exhaustive()
    }
}

impl CmdbClient {
    /// Connect using the given configuration.
    ///
    /// # Errors
    ///
    /// See [`CmdbClientBuilder::connect`].
    pub async fn connect(config: FortiGateConfig) -> Result<Self> {
        CmdbClientBuilder::new(config).connect().await
    }

    /// Return the device base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the VDOM requests are scoped to.
    #[must_use]
    pub fn vdom(&self) -> &str {
        &self.vdom
    }

    /// Check that the device exposes every bound table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first table the device does not
    /// answer for, or the underlying authentication/transport error.
    pub async fn verify_surface(&self) -> Result<()> {
        for table in CmdbTable::all() {
            let mut params = QueryParams::new();
            params.push("action", "schema");
            match self
                .send(Method::GET, *table, None, None, params)
                .await
            {
                Ok(_) => debug!(table = %table, "table available"),
                Err(err @ (Error::Authentication(_) | Error::Connectivity(_) | Error::Timeout(_))) => {
                    return Err(err)
                }
                Err(err) => {
                    return Err(Error::Config(format!(
                        "device does not expose {} ({table}): {err}",
                        table.display_name()
                    )))
                }
            }
        }
        info!(tables = CmdbTable::all().len(), "verified CMDB surface");
        Ok(())
    }

    /// Close the session. Token clients have nothing to close.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request cannot be sent.
    pub async fn logout(&self) -> Result<()> {
        if matches!(self.auth, Auth::Token(_)) {
            return Ok(());
        }
        let url = self.base_url.join("logout")?;
        let response = self.http.post(url).send().await?;
        if response.status().is_success() {
            info!("logged out of FortiGate");
        } else {
            warn!(status = %response.status(), "logout was not acknowledged");
        }
        Ok(())
    }

    fn resource_url(&self, table: CmdbTable, mkey: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::InvalidEndpoint(format!("{} cannot carry a path", self.base_url))
            })?;
            segments
                .pop_if_empty()
                .extend(["api", "v2", "cmdb"])
                .extend(table.path().split('/'));
            if let Some(mkey) = mkey {
                segments.push(mkey);
            }
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder, method: &Method) -> RequestBuilder {
        match &self.auth {
            Auth::Token(token) => {
                request.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            }
            Auth::Session { csrf_token, .. } if *method != Method::GET => {
                let token = csrf_token.read().unwrap_or_else(PoisonError::into_inner);
                request.header(CSRF_HEADER, token.expose_secret())
            }
            Auth::Session { .. } => request,
        }
    }

    async fn send(
        &self,
        method: Method,
        table: CmdbTable,
        mkey: Option<&str>,
        body: Option<&Value>,
        params: QueryParams,
    ) -> Result<Value> {
        let url = self.resource_url(table, mkey)?;
        let mut query = QueryParams::new();
        query.push("vdom", &self.vdom);
        let pairs: Vec<_> = query
            .into_pairs()
            .into_iter()
            .chain(params.into_pairs())
            .collect();

        debug!(%method, %table, mkey, "sending CMDB request");
        if let Some(payload) = body {
            debug!(%table, payload = %payload, "request body");
        }

        let (mut status, mut text) = self.dispatch(&method, &url, &pairs, body).await?;
        if status == StatusCode::UNAUTHORIZED && self.renew_session().await? {
            (status, text) = self.dispatch(&method, &url, &pairs, body).await?;
        }

        if !status.is_success() {
            let err = map_status_to_error(status, &text);
            warn!(%method, %table, mkey, %status, "CMDB request failed");
            return Err(err);
        }
        parse_envelope(&text)
    }

    async fn dispatch(
        &self,
        method: &Method,
        url: &Url,
        pairs: &[(&'static str, String)],
        body: Option<&Value>,
    ) -> Result<(StatusCode, String)> {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .query(pairs)
            .header(ACCEPT, "application/json");
        request = self.authorize(request, method);
        if let Some(payload) = body {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        Ok((status, response.text().await?))
    }

    /// Log in again after the device dropped the session.
    ///
    /// Returns `false` for token clients, which have no session to renew.
    async fn renew_session(&self) -> Result<bool> {
        let Auth::Session {
            username,
            password,
            csrf_token,
        } = &self.auth
        else {
            return Ok(false);
        };
        warn!(%username, "FortiGate session expired, logging in again");
        let renewed = login(&self.http, &self.base_url, username, password).await?;
        *csrf_token.write().unwrap_or_else(PoisonError::into_inner) = SecretString::from(renewed);
        info!(%username, "FortiGate session renewed");
        Ok(true)
    }
}

#[async_trait]
impl CmdbApi for CmdbClient {
    async fn list(&self, table: CmdbTable) -> Result<Vec<Value>> {
        let envelope = self
            .send(Method::GET, table, None, None, QueryParams::new())
            .await?;
        match envelope.get("results") {
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(Error::InvalidResponse(format!(
                "expected a list of {} entries, got {other}",
                table.display_name()
            ))),
        }
    }

    async fn get(&self, table: CmdbTable, mkey: &str) -> Result<Value> {
        let envelope = self
            .send(Method::GET, table, Some(mkey), None, QueryParams::new())
            .await?;
        let entry = match envelope.get("results") {
            Some(Value::Array(items)) => items.first().cloned(),
            Some(Value::Object(_)) => envelope.get("results").cloned(),
            _ => None,
        };
        entry.ok_or_else(|| Error::RemoteApi {
            status: 404,
            message: format!("{} '{mkey}' not found", table.display_name()),
            details: Some(envelope),
        })
    }

    async fn create(&self, table: CmdbTable, payload: Value) -> Result<Value> {
        let payload = with_default_vdom(table, payload, &self.vdom);
        self.send(Method::POST, table, None, Some(&payload), QueryParams::new())
            .await
    }

    async fn update(&self, table: CmdbTable, mkey: &str, payload: Value) -> Result<Value> {
        self.send(Method::PUT, table, Some(mkey), Some(&payload), QueryParams::new())
            .await
    }

    async fn delete(&self, table: CmdbTable, mkey: &str) -> Result<Value> {
        self.send(Method::DELETE, table, Some(mkey), None, QueryParams::new())
            .await
    }

    async fn move_entry(
        &self,
        table: CmdbTable,
        mkey: &str,
        position: MovePosition,
        reference: &str,
    ) -> Result<Value> {
        let mut params = QueryParams::new();
        params.push("action", "move");
        params.push(position.as_str(), reference);
        self.send(Method::PUT, table, Some(mkey), None, params).await
    }
}

/// Interfaces must name the VDOM they belong to.
fn with_default_vdom(table: CmdbTable, mut payload: Value, vdom: &str) -> Value {
    if table == CmdbTable::SystemInterface {
        if let Some(map) = payload.as_object_mut() {
            map.entry("vdom")
                .or_insert_with(|| Value::String(vdom.to_string()));
        }
    }
    payload
}

async fn login(
    http: &reqwest::Client,
    base_url: &Url,
    username: &str,
    password: &SecretString,
) -> Result<String> {
    let url = base_url.join("logincheck")?;
    let response = http
        .post(url)
        .form(&[
            ("username", username),
            ("secretkey", password.expose_secret()),
            ("ajax", "1"),
        ])
        .send()
        .await?;

    let status = response.status();
    let csrf_token = response
        .cookies()
        .find(|cookie| cookie.name().starts_with(CSRF_COOKIE_PREFIX))
        .map(|cookie| cookie.value().trim_matches('"').to_string())
        .filter(|token| !token.is_empty());
    let body = response.text().await?;

    if !status.is_success() {
        return Err(Error::Authentication(format!(
            "login rejected with HTTP {status}"
        )));
    }
    if !body.trim_start().starts_with('1') {
        return Err(Error::Authentication(
            "invalid username or password".to_string(),
        ));
    }
    csrf_token.ok_or_else(|| {
        Error::Authentication("login succeeded but no CSRF token was issued".to_string())
    })
}

fn parse_envelope(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let envelope: Value = serde_json::from_str(text)?;
    if envelope.get("status").and_then(Value::as_str) == Some("error") {
        return Err(Error::from_envelope(envelope));
    }
    Ok(envelope)
}

fn map_status_to_error(status: StatusCode, text: &str) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authentication(format!(
            "FortiGate rejected the request (HTTP {status}); check credentials and admin profile"
        )),
        _ => Error::remote(status.as_u16(), text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn config_for(server: &MockServer, credentials: Credentials) -> FortiGateConfig {
        let address = server.address();
        FortiGateConfig::new(address.ip().to_string(), credentials)
            .unwrap()
            .with_port(address.port())
    }

    async fn token_client(server: &MockServer) -> CmdbClient {
        CmdbClient::connect(config_for(server, Credentials::api_token("tok-123")))
            .await
            .unwrap()
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/logincheck"))
            .and(body_string_contains("username=admin"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "APSCOOKIE_1=abc; path=/")
                    .append_header("set-cookie", "ccsrftoken=\"CSRF42\"; path=/")
                    .set_body_string("1document.location=\"/ng/prompt?viewOnly&redir=%2Fng%2F\";\n"),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn list_policies_returns_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/firewall/policy"))
            .and(query_param("vdom", "root"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "http_method": "GET",
                "results": [{"policyid": 1, "name": "allow-dns"}, {"policyid": 2}],
                "vdom": "root",
                "status": "success",
                "http_status": 200
            })))
            .mount(&server)
            .await;

        let client = token_client(&server).await;
        let policies = client.list(CmdbTable::FirewallPolicy).await.unwrap();
        assert_eq!(policies.len(), 2);
        assert_eq!(policies[0]["name"], "allow-dns");
    }

    #[tokio::test]
    async fn get_uses_dotted_table_path_and_encoded_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/firewall.service/custom/My%20Web"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "My Web", "tcp-portrange": "8080"}],
                "status": "success",
                "http_status": 200
            })))
            .mount(&server)
            .await;

        let client = token_client(&server).await;
        let entry = client
            .get(CmdbTable::FirewallServiceCustom, "My Web")
            .await
            .unwrap();
        assert_eq!(entry["tcp-portrange"], "8080");
    }

    #[tokio::test]
    async fn get_not_found_keeps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/firewall/policy/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": "error",
                "http_status": 404,
                "error": -3
            })))
            .mount(&server)
            .await;

        let client = token_client(&server).await;
        let err = client.get(CmdbTable::FirewallPolicy, "99").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.details().unwrap()["error"], -3);
    }

    #[tokio::test]
    async fn server_error_body_becomes_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/router/static"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "internal"})))
            .mount(&server)
            .await;

        let client = token_client(&server).await;
        let err = client.list(CmdbTable::RouterStatic).await.unwrap_err();
        match err {
            Error::RemoteApi {
                status, details, ..
            } => {
                assert_eq!(status, 500);
                assert_eq!(details, Some(json!({"error": "internal"})));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_envelope_with_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/cmdb/firewall/address"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "http_status": 500,
                "error": -5,
                "cli_error": "entry already exists"
            })))
            .mount(&server)
            .await;

        let client = token_client(&server).await;
        let err = client
            .create(CmdbTable::FirewallAddress, json!({"name": "dup"}))
            .await
            .unwrap_err();
        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/system/interface"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = token_client(&server).await;
        let err = client.list(CmdbTable::SystemInterface).await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[tokio::test]
    async fn create_interface_fills_vdom() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/cmdb/system/interface"))
            .and(body_json(json!({"name": "lo9", "type": "loopback", "ip": "10.9.9.9 255.255.255.255", "vdom": "root"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "http_status": 200,
                "mkey": "lo9"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = token_client(&server).await;
        let envelope = client
            .create(
                CmdbTable::SystemInterface,
                json!({"name": "lo9", "type": "loopback", "ip": "10.9.9.9 255.255.255.255"}),
            )
            .await
            .unwrap();
        assert_eq!(envelope["mkey"], "lo9");
    }

    #[tokio::test]
    async fn move_entry_sends_one_put_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v2/cmdb/firewall/policy/3"))
            .and(query_param("action", "move"))
            .and(query_param("after", "1"))
            .and(query_param("vdom", "root"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "http_status": 200,
                "mkey": "3"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = token_client(&server).await;
        client
            .move_entry(CmdbTable::FirewallPolicy, "3", MovePosition::After, "1")
            .await
            .unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].body.is_empty());
    }

    #[tokio::test]
    async fn password_login_sends_csrf_on_writes() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/api/v2/cmdb/firewall/policy/5"))
            .and(header("x-csrftoken", "CSRF42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "http_status": 200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CmdbClient::connect(config_for(
            &server,
            Credentials::password("admin", "secret"),
        ))
        .await
        .unwrap();
        client.delete(CmdbTable::FirewallPolicy, "5").await.unwrap();
    }

    #[tokio::test]
    async fn rejected_login_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/logincheck"))
            .respond_with(ResponseTemplate::new(200).set_body_string("0"))
            .mount(&server)
            .await;

        let err = CmdbClient::connect(config_for(
            &server,
            Credentials::password("admin", "wrong"),
        ))
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[tokio::test]
    async fn logout_posts_for_sessions() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path("/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = CmdbClient::connect(config_for(
            &server,
            Credentials::password("admin", "secret"),
        ))
        .await
        .unwrap();
        client.logout().await.unwrap();
    }

    #[tokio::test]
    async fn verify_surface_checks_every_table() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "schema"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "http_status": 200,
                "results": {}
            })))
            .expect(CmdbTable::all().len() as u64)
            .mount(&server)
            .await;

        let client = token_client(&server).await;
        client.verify_surface().await.unwrap();
    }

    #[tokio::test]
    async fn verify_surface_fails_on_missing_table() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/firewall.service/group"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": "error",
                "http_status": 404
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("action", "schema"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "http_status": 200
            })))
            .mount(&server)
            .await;

        let client = token_client(&server).await;
        let err = client.verify_surface().await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("service group"));
    }

    #[tokio::test]
    async fn csrf_cookie_may_carry_port_suffix() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/logincheck"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "ccsrftoken_443_3dc9a2b=XYZ; path=/")
                    .set_body_string("1"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/cmdb/firewall/address"))
            .and(header("x-csrftoken", "XYZ"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "http_status": 200,
                "mkey": "web"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CmdbClient::connect(config_for(
            &server,
            Credentials::password("admin", "secret"),
        ))
        .await
        .unwrap();
        client
            .create(CmdbTable::FirewallAddress, json!({"name": "web"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn login_without_csrf_cookie_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/logincheck"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "ccsrftoken=\"\"; path=/")
                    .append_header("set-cookie", "APSCOOKIE_1=abc; path=/")
                    .set_body_string("1"),
            )
            .mount(&server)
            .await;

        let err = CmdbClient::connect(config_for(
            &server,
            Credentials::password("admin", "secret"),
        ))
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        assert!(err.to_string().contains("CSRF"));
    }

    #[tokio::test]
    async fn expired_session_is_renewed_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/logincheck"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "ccsrftoken=\"FIRST\"; path=/")
                    .set_body_string("1"),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/logincheck"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "ccsrftoken=\"SECOND\"; path=/")
                    .set_body_string("1"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v2/cmdb/firewall/policy/5"))
            .and(header("x-csrftoken", "FIRST"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v2/cmdb/firewall/policy/5"))
            .and(header("x-csrftoken", "SECOND"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "http_status": 200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CmdbClient::connect(config_for(
            &server,
            Credentials::password("admin", "secret"),
        ))
        .await
        .unwrap();
        client.delete(CmdbTable::FirewallPolicy, "5").await.unwrap();
    }

    #[tokio::test]
    async fn token_clients_do_not_renew() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/firewall/policy"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/logincheck"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1"))
            .expect(0)
            .mount(&server)
            .await;

        let client = token_client(&server).await;
        let err = client.list(CmdbTable::FirewallPolicy).await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }
}
