use crate::core::errors::ModemError;
use crate::core::types::{HeaderTemplate, HttpMethod, RequestDescriptor};
use std::fmt;
use std::str::FromStr;

pub static GET_SESSION_TOKEN: RequestDescriptor = RequestDescriptor {
    method: HttpMethod::Get,
    path: "/api/webserver/SesTokInfo",
    header: HeaderTemplate::Short,
    body: "",
};

pub static LOGIN_USER: RequestDescriptor = RequestDescriptor {
    method: HttpMethod::Post,
    path: "/api/user/login",
    header: HeaderTemplate::Long,
    body: concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        "<request>",
        "<Username>{username}</Username>",
        "<Password>{password}</Password>",
        "<password_type>4</password_type>",
        "</request>"
    ),
};

pub static LOGOUT_USER: RequestDescriptor = RequestDescriptor {
    method: HttpMethod::Post,
    path: "/api/user/logout",
    header: HeaderTemplate::Long,
    body: concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        "<request>",
        "<Logout>1</Logout>",
        "</request>"
    ),
};

pub static DEVICE_INFO: RequestDescriptor = RequestDescriptor {
    method: HttpMethod::Get,
    path: "/api/device/information",
    header: HeaderTemplate::Short,
    body: "",
};

pub static SIGNAL_PARAMETERS: RequestDescriptor = RequestDescriptor {
    method: HttpMethod::Get,
    path: "/api/device/signal",
    header: HeaderTemplate::Short,
    body: "",
};

/// Named operations of the device API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestName {
    GetSessionToken,
    LoginUser,
    LogoutUser,
    DeviceInfo,
    SignalParameters,
}

impl RequestName {
    pub const ALL: [Self; 5] = [
        Self::GetSessionToken,
        Self::LoginUser,
        Self::LogoutUser,
        Self::DeviceInfo,
        Self::SignalParameters,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetSessionToken => "GET_SESSION_TOKEN",
            Self::LoginUser => "LOGIN_USER",
            Self::LogoutUser => "LOGOUT_USER",
            Self::DeviceInfo => "DEVICE_INFO",
            Self::SignalParameters => "SIGNAL_PARAMETERS",
        }
    }

    pub fn descriptor(self) -> &'static RequestDescriptor {
        match self {
            Self::GetSessionToken => &GET_SESSION_TOKEN,
            Self::LoginUser => &LOGIN_USER,
            Self::LogoutUser => &LOGOUT_USER,
            Self::DeviceInfo => &DEVICE_INFO,
            Self::SignalParameters => &SIGNAL_PARAMETERS,
        }
    }
}

impl fmt::Display for RequestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestName {
    type Err = ModemError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|request| request.as_str() == name)
            .ok_or_else(|| ModemError::UnknownRequestName(name.to_string()))
    }
}

/// Look up a request descriptor by its catalog name
pub fn lookup(name: &str) -> Result<&'static RequestDescriptor, ModemError> {
    name.parse::<RequestName>().map(RequestName::descriptor)
}
