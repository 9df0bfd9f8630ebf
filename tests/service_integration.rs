use std::fs;
use zenrate::config::AppConfig;
use zenrate::core::RateSource;
use zenrate::{AppCommand, build_service, run_command};

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_coingecko_mock(mock_response: &str, status_code: u16) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(provider: &str, base_url: &str, fallback_rate: f64) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
enabled: true
provider: "{provider}"
fallback_rate: {fallback_rate}
cache_ttl_ms: 60000
providers:
  {provider}:
    base_url: "{base_url}"
"#
        );
        std::fs::write(config_file.path(), &config_content).expect("Failed to write config file");
        config_file
    }
}

const COINGECKO_PRICES: &str = r#"{"bitcoin": {"usd": 50000.0}, "zcash": {"usd": 25.0}}"#;

#[test_log::test(tokio::test)]
async fn test_full_conversion_flow_with_coingecko_mock() {
    let mock_server = test_utils::create_coingecko_mock(COINGECKO_PRICES, 200).await;
    let config_file = test_utils::write_config("coingecko", &mock_server.uri(), 1.0);

    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let service = build_service(&config);

    let result = service.convert(0.1).await.unwrap();
    assert_eq!(result.exchange_rate, 2000.0);
    assert_eq!(result.zec_amount, 200.0);
    assert_eq!(result.source, RateSource::Live);
}

#[test_log::test(tokio::test)]
async fn test_rate_is_cached_within_ttl() {
    let mock_server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/api/v3/simple/price"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(COINGECKO_PRICES))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config_file = test_utils::write_config("coingecko", &mock_server.uri(), 1.0);
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let service = build_service(&config);

    assert_eq!(service.get_rate().await, 2000.0);
    assert_eq!(service.get_rate().await, 2000.0);
    // Mock server verifies exactly one request on drop
}

#[test_log::test(tokio::test)]
async fn test_provider_failure_falls_back_to_static_rate() {
    let mock_server = test_utils::create_coingecko_mock("Internal Server Error", 500).await;
    let config_file = test_utils::write_config("coingecko", &mock_server.uri(), 1.0);

    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let service = build_service(&config);

    let quote = service.resolve_rate().await;
    assert_eq!(quote.rate, 1.0);
    assert_eq!(quote.source, RateSource::Fallback);

    // Conversions still succeed, priced on the fallback rate
    let result = service.convert(2.0).await.unwrap();
    assert_eq!(result.zec_amount, 2.0);
}

#[test_log::test(tokio::test)]
async fn test_kraken_alias_key_flow() {
    let mock_server = wiremock::MockServer::start().await;
    let mock_response = r#"{
        "error": [],
        "result": {
            "XZECXXBT": {"c": ["0.00050000", "3.5"]}
        }
    }"#;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/0/public/Ticker"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(mock_response))
        .mount(&mock_server)
        .await;

    let config_file = test_utils::write_config("kraken", &mock_server.uri(), 1.0);
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let service = build_service(&config);

    let quote = service.resolve_rate().await;
    assert_eq!(quote.rate, 2000.0);
    assert_eq!(quote.source, RateSource::Live);
}

#[test_log::test(tokio::test)]
async fn test_binance_two_ticker_flow() {
    let mock_server = wiremock::MockServer::start().await;
    for (symbol, body) in [
        ("BTCUSDT", r#"{"symbol":"BTCUSDT","price":"50000.00"}"#),
        ("ZECUSDT", r#"{"symbol":"ZECUSDT","price":"25.00"}"#),
    ] {
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/api/v3/ticker/price"))
            .and(wiremock::matchers::query_param("symbol", symbol))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;
    }

    let config_file = test_utils::write_config("binance", &mock_server.uri(), 1.0);
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let service = build_service(&config);

    let result = service.convert(0.1).await.unwrap();
    assert_eq!(result.exchange_rate, 2000.0);
    assert_eq!(result.zec_amount, 200.0);
}

#[test_log::test(tokio::test)]
async fn test_run_command_status_smoke() {
    let mock_server = test_utils::create_coingecko_mock(COINGECKO_PRICES, 200).await;
    let config_file = test_utils::write_config("coingecko", &mock_server.uri(), 1.0);

    let result = run_command(
        AppCommand::Status,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Status command failed: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_malformed_fallback_rate_still_loads() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = r#"
provider: "coingecko"
fallback_rate: "not a number"
"#;
    fs::write(config_file.path(), config_content).expect("Failed to write config file");

    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    assert_eq!(config.fallback_rate, 1.0);
}
