use crate::core::config::ModemConfig;
use crate::core::errors::ModemError;
use crate::core::kernel::{ReqwestTransport, TransportConfig};
use crate::modem::client::Modem;

/// Create a modem client talking HTTP to the configured address
///
/// The transport is not opened until `Modem::connect` is called.
pub fn build_modem(config: &ModemConfig) -> Result<Modem<ReqwestTransport>, ModemError> {
    let transport_config =
        TransportConfig::new(&config.address)?.with_timeout(config.timeout_seconds);

    Ok(Modem::new(ReqwestTransport::new(transport_config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigError;
    use crate::core::kernel::Transport;
    use crate::core::types::ConnectionState;

    #[test]
    fn test_build_modem_from_config() {
        let config = ModemConfig::new("admin".to_string(), "admin".to_string())
            .address("192.168.1.1".to_string())
            .timeout_seconds(4);

        let modem = build_modem(&config).unwrap();
        assert_eq!(modem.state(), ConnectionState::Disconnected);
        assert!(!modem.transport().is_open());
        assert_eq!(modem.transport().config().base_url, "http://192.168.1.1");
        assert_eq!(modem.transport().config().timeout_seconds, 4);
    }

    #[test]
    fn test_build_modem_rejects_https_address() {
        let config = ModemConfig::default().address("https://192.168.8.1".to_string());

        assert!(matches!(
            build_modem(&config),
            Err(ModemError::Config(ConfigError::InvalidConfiguration(_)))
        ));
    }
}
