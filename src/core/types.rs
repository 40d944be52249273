use crate::core::kernel::codec::extract_field;
use roxmltree::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods used by the device API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header set a request is sent with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTemplate {
    /// `X-Requested-With` and `Cookie`
    Short,
    /// Short header plus `__RequestVerificationToken` and `Connection: keep-alive`
    Long,
}

pub const HEADER_REQUESTED_WITH: &str = "X-Requested-With";
pub const HEADER_COOKIE: &str = "Cookie";
pub const HEADER_VERIFICATION_TOKEN: &str = "__RequestVerificationToken";
pub const HEADER_CONNECTION: &str = "Connection";

const SHORT_HEADER: [(&str, &str); 2] = [
    (HEADER_REQUESTED_WITH, "XMLHttpRequest"),
    (HEADER_COOKIE, ""),
];

const LONG_HEADER: [(&str, &str); 4] = [
    (HEADER_REQUESTED_WITH, "XMLHttpRequest"),
    (HEADER_VERIFICATION_TOKEN, ""),
    (HEADER_CONNECTION, "keep-alive"),
    (HEADER_COOKIE, ""),
];

impl HeaderTemplate {
    /// Template entries in wire order. Session and token slots are empty.
    pub const fn entries(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Short => &SHORT_HEADER,
            Self::Long => &LONG_HEADER,
        }
    }
}

/// Static description of one API operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: &'static str,
    pub header: HeaderTemplate,
    /// XML body, possibly holding `{username}` and `{password}` slots
    pub body: &'static str,
}

/// Lifecycle of a `Modem` client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    TokenObtained,
    Authenticated,
    LoggedOut,
}

impl ConnectionState {
    pub const fn is_connected(self) -> bool {
        !matches!(self, Self::Disconnected)
    }
}

/// Session and verification token issued by the device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub session_id: Option<String>,
    pub token_id: Option<String>,
    pub authenticated: bool,
}

impl Session {
    pub fn new(session_id: impl Into<String>, token_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            token_id: Some(token_id.into()),
            authenticated: false,
        }
    }

    /// Both the session cookie and the token are present
    pub fn has_credentials(&self) -> bool {
        self.session_id.is_some() && self.token_id.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Identification data from `/api/device/information`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "DeviceName")]
    pub device_name: Option<String>,
    #[serde(rename = "SerialNumber")]
    pub serial_number: Option<String>,
    #[serde(rename = "Imei")]
    pub imei: Option<String>,
    #[serde(rename = "Imsi")]
    pub imsi: Option<String>,
    #[serde(rename = "Iccid")]
    pub iccid: Option<String>,
    #[serde(rename = "Msisdn")]
    pub msisdn: Option<String>,
    #[serde(rename = "HardwareVersion")]
    pub hardware_version: Option<String>,
    #[serde(rename = "SoftwareVersion")]
    pub software_version: Option<String>,
    #[serde(rename = "WebUIVersion")]
    pub web_ui_version: Option<String>,
    #[serde(rename = "MacAddress1")]
    pub mac_address1: Option<String>,
    #[serde(rename = "MacAddress2")]
    pub mac_address2: Option<String>,
    #[serde(rename = "ProductFamily")]
    pub product_family: Option<String>,
    #[serde(rename = "Classify")]
    pub classify: Option<String>,
    #[serde(rename = "supportmode")]
    pub support_mode: Option<String>,
    #[serde(rename = "workmode")]
    pub work_mode: Option<String>,
}

impl DeviceInfo {
    /// Populate from a response document. Missing tags stay `None`.
    pub fn from_document(doc: &Document<'_>) -> Self {
        Self {
            device_name: extract_field(doc, "DeviceName"),
            serial_number: extract_field(doc, "SerialNumber"),
            imei: extract_field(doc, "Imei"),
            imsi: extract_field(doc, "Imsi"),
            iccid: extract_field(doc, "Iccid"),
            msisdn: extract_field(doc, "Msisdn"),
            hardware_version: extract_field(doc, "HardwareVersion"),
            software_version: extract_field(doc, "SoftwareVersion"),
            web_ui_version: extract_field(doc, "WebUIVersion"),
            mac_address1: extract_field(doc, "MacAddress1"),
            mac_address2: extract_field(doc, "MacAddress2"),
            product_family: extract_field(doc, "ProductFamily"),
            classify: extract_field(doc, "Classify"),
            support_mode: extract_field(doc, "supportmode"),
            work_mode: extract_field(doc, "workmode"),
        }
    }
}

/// Radio measurements from `/api/device/signal`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalParameters {
    pub pci: Option<String>,
    pub sc: Option<String>,
    pub cell_id: Option<String>,
    pub rsrq: Option<String>,
    pub rsrp: Option<String>,
    pub rssi: Option<String>,
    pub sinr: Option<String>,
    pub rscp: Option<String>,
    pub ecio: Option<String>,
    pub mode: Option<String>,
}

impl SignalParameters {
    pub fn from_document(doc: &Document<'_>) -> Self {
        Self {
            pci: extract_field(doc, "pci"),
            sc: extract_field(doc, "sc"),
            cell_id: extract_field(doc, "cell_id"),
            rsrq: extract_field(doc, "rsrq"),
            rsrp: extract_field(doc, "rsrp"),
            rssi: extract_field(doc, "rssi"),
            sinr: extract_field(doc, "sinr"),
            rscp: extract_field(doc, "rscp"),
            ecio: extract_field(doc, "ecio"),
            mode: extract_field(doc, "mode"),
        }
    }
}
