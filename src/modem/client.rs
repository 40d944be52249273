use crate::core::errors::ModemError;
use crate::core::kernel::codec::{self, LoginPayload, Substitutions};
use crate::core::kernel::transport::{HttpResponse, Transport};
use crate::core::types::{
    ConnectionState, DeviceInfo, RequestDescriptor, Session, SignalParameters,
};
use crate::modem::hasher::compute_login_hash;
use crate::modem::requests::{RequestName, GET_SESSION_TOKEN, LOGIN_USER, LOGOUT_USER};
use tracing::{debug, instrument, trace, warn};

/// Response header carrying the new session cookie after login
pub const HEADER_SET_COOKIE: &str = "Set-Cookie";
/// Response header carrying the new verification token after login
pub const HEADER_LOGIN_TOKEN: &str = "__RequestVerificationTokenone";

/// Client for one modem, driving the session/authentication lifecycle
///
/// `Disconnected -> Connected -> TokenObtained -> Authenticated -> LoggedOut`,
/// with `disconnect()` returning to `Disconnected` from any connected state.
/// All operations take `&mut self`, so requests are sent one at a time.
pub struct Modem<T: Transport> {
    transport: T,
    state: ConnectionState,
    session: Session,
    device_info: DeviceInfo,
    signal_parameters: SignalParameters,
}

impl<T: Transport> std::fmt::Debug for Modem<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modem")
            .field("state", &self.state)
            .field("authenticated", &self.session.authenticated)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Modem<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: ConnectionState::Disconnected,
            session: Session::default(),
            device_info: DeviceInfo::default(),
            signal_parameters: SignalParameters::default(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current session id and token id
    pub fn session_token(&self) -> (Option<&str>, Option<&str>) {
        (
            self.session.session_id.as_deref(),
            self.session.token_id.as_deref(),
        )
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == ConnectionState::Authenticated
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Device information from the last `call_device_info()`
    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    /// Signal parameters from the last `call_signal_parameters()`
    pub fn signal_parameters(&self) -> &SignalParameters {
        &self.signal_parameters
    }

    fn set_state(&mut self, state: ConnectionState) {
        debug!(from = ?self.state, to = ?state, "Modem state transition");
        self.state = state;
    }

    fn ensure_connected(&self) -> Result<(), ModemError> {
        if self.state.is_connected() {
            Ok(())
        } else {
            Err(ModemError::NotConnected)
        }
    }

    fn ensure_authenticated(&self) -> Result<(), ModemError> {
        self.ensure_connected()?;
        if self.state == ConnectionState::Authenticated {
            Ok(())
        } else {
            Err(ModemError::NotAuthenticated)
        }
    }

    /// Open the transport to the device
    pub fn connect(&mut self) -> Result<(), ModemError> {
        if self.state.is_connected() {
            return Err(ModemError::AlreadyConnected);
        }

        self.transport.open()?;
        self.set_state(ConnectionState::Connected);
        Ok(())
    }

    /// Close the transport and drop the session
    pub fn disconnect(&mut self) -> Result<(), ModemError> {
        self.ensure_connected()?;

        self.transport.close();
        self.session.clear();
        self.set_state(ConnectionState::Disconnected);
        Ok(())
    }

    /// Encode, send, decode and check for a device-reported error
    #[instrument(skip(self, descriptor, substitutions), fields(method = %descriptor.method, path = %descriptor.path))]
    async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
        substitutions: &Substitutions<'_>,
    ) -> Result<HttpResponse, ModemError> {
        let request = codec::encode(descriptor, substitutions)?;
        let response = self.transport.send(&request).await?;

        // bodies carry session ids and tokens, only their size is logged
        trace!(status = response.status, body_len = response.body.len(), "Device response");
        if !response.is_success() {
            debug!(status = response.status, "Non-success HTTP status, classifying body");
        }

        let error_code = {
            let doc = codec::decode(&response.body)?;
            codec::extract_error_code(&doc)
        };

        if let Some(code) = error_code {
            let error = ModemError::from_device_code(&code);
            warn!(code = %code, error = %error, "Device reported an error");
            return Err(error);
        }

        Ok(response)
    }

    /// Fetch a fresh session id and token from `SesTokInfo`
    ///
    /// Replaces any previous session, so the client is no longer authenticated
    /// afterwards.
    #[instrument(skip(self))]
    pub async fn obtain_session_token(&mut self) -> Result<(), ModemError> {
        self.ensure_connected()?;

        let response = self
            .dispatch(&GET_SESSION_TOKEN, &Substitutions::default())
            .await?;

        let doc = codec::decode(&response.body)?;
        let session_id = codec::extract_field(&doc, "SesInfo").ok_or_else(|| {
            ModemError::MalformedResponse("SesTokInfo response is missing SesInfo".to_string())
        })?;
        let token_id = codec::extract_field(&doc, "TokInfo").ok_or_else(|| {
            ModemError::MalformedResponse("SesTokInfo response is missing TokInfo".to_string())
        })?;

        self.session = Session::new(session_id, token_id);
        self.set_state(ConnectionState::TokenObtained);
        Ok(())
    }

    /// Log in with the current session and token
    ///
    /// On success the device hands out a new session cookie and token in the
    /// response headers, which replace the current ones. On failure the
    /// session is left as it was.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ModemError> {
        self.ensure_connected()?;

        let (Some(session_id), Some(token_id)) = (
            self.session.session_id.as_deref(),
            self.session.token_id.as_deref(),
        ) else {
            return Err(ModemError::NotConnected);
        };

        let password_hash = compute_login_hash(username, password, token_id);
        let substitutions = Substitutions {
            session_id: Some(session_id),
            token_id: Some(token_id),
            login: Some(LoginPayload {
                username,
                password_hash: &password_hash,
            }),
        };

        let response = self.dispatch(&LOGIN_USER, &substitutions).await?;

        let session_id = first_header_segment(&response, HEADER_SET_COOKIE)?;
        let token_id = first_header_segment(&response, HEADER_LOGIN_TOKEN)?;

        self.session = Session {
            session_id: Some(session_id),
            token_id: Some(token_id),
            authenticated: true,
        };
        debug_assert!(self.session.has_credentials());
        self.set_state(ConnectionState::Authenticated);
        Ok(())
    }

    /// Send a catalog request on the authenticated session
    ///
    /// The session cookie is attached, plus the token for long-header
    /// requests. If the device rejects the session or token the client drops
    /// back to `TokenObtained` and the caller has to log in again.
    #[instrument(skip(self))]
    pub async fn call_authenticated(
        &mut self,
        request: RequestName,
    ) -> Result<HttpResponse, ModemError> {
        self.ensure_authenticated()?;

        if matches!(
            request,
            RequestName::GetSessionToken | RequestName::LoginUser | RequestName::LogoutUser
        ) {
            return Err(ModemError::InvalidRequest(format!(
                "{} is part of the session lifecycle and has its own method",
                request
            )));
        }

        let substitutions = Substitutions {
            session_id: self.session.session_id.as_deref(),
            token_id: self.session.token_id.as_deref(),
            login: None,
        };

        let result = self.dispatch(request.descriptor(), &substitutions).await;
        match result {
            Err(error) if error.is_session_invalidation() => {
                warn!(%request, "Session rejected by the device, login required");
                self.session.authenticated = false;
                self.set_state(ConnectionState::TokenObtained);
                Err(error)
            }
            result => result,
        }
    }

    /// Fetch and cache the device information
    pub async fn call_device_info(&mut self) -> Result<&DeviceInfo, ModemError> {
        let response = self.call_authenticated(RequestName::DeviceInfo).await?;
        let doc = codec::decode(&response.body)?;
        self.device_info = DeviceInfo::from_document(&doc);
        Ok(&self.device_info)
    }

    /// Fetch and cache the signal parameters
    pub async fn call_signal_parameters(&mut self) -> Result<&SignalParameters, ModemError> {
        let response = self
            .call_authenticated(RequestName::SignalParameters)
            .await?;
        let doc = codec::decode(&response.body)?;
        self.signal_parameters = SignalParameters::from_document(&doc);
        Ok(&self.signal_parameters)
    }

    /// Log out the current user
    ///
    /// The local session is cleared whatever the device answers. A reported
    /// error is still returned to the caller.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<(), ModemError> {
        self.ensure_authenticated()?;

        let substitutions = Substitutions {
            session_id: self.session.session_id.as_deref(),
            token_id: self.session.token_id.as_deref(),
            login: None,
        };
        let result = self.dispatch(&LOGOUT_USER, &substitutions).await;

        self.session.clear();
        self.set_state(ConnectionState::LoggedOut);

        if let Err(error) = &result {
            warn!(error = %error, "Logout failed on the device, local session cleared");
        }
        result.map(|_| ())
    }
}

/// Header value up to the first `;`
fn first_header_segment(response: &HttpResponse, name: &str) -> Result<String, ModemError> {
    response
        .header(name)
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ModemError::MalformedResponse(format!("Login response is missing the {} header", name))
        })
}
