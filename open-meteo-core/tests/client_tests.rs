//! Client behaviour against a mock Open-Meteo server.

use std::time::Duration;

use open_meteo_core::{
    ClientConfig, DailyVariable, Endpoint, ForecastRequest, GeocodingRequest, HourlyVariable,
    OpenMeteo, OpenMeteoError, QueryParams, WeatherApi,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn sample_forecast_response() -> serde_json::Value {
    json!({
        "latitude": 52.28,
        "longitude": 6.88,
        "generationtime_ms": 0.21,
        "utc_offset_seconds": 0,
        "timezone": "GMT",
        "timezone_abbreviation": "GMT",
        "elevation": 35.0,
        "current_weather": {
            "time": "2024-01-15T12:00",
            "temperature": 5.5,
            "windspeed": 12.5,
            "winddirection": 225,
            "weathercode": 3
        },
        "hourly_units": {
            "time": "iso8601",
            "temperature_2m": "°C",
            "relativehumidity_2m": "%"
        },
        "hourly": {
            "time": [
                "2024-01-15T00:00",
                "2024-01-15T01:00",
                "2024-01-15T02:00",
                "2024-01-15T03:00"
            ],
            "temperature_2m": [1.5, 1.2, 0.9, 0.7]
        },
        "daily_units": {
            "time": "iso8601",
            "sunrise": "iso8601",
            "sunset": "iso8601"
        },
        "daily": {
            "time": ["2024-01-15"],
            "sunrise": ["2024-01-15T07:41"],
            "sunset": ["2024-01-15T16:02"]
        }
    })
}

fn sample_request() -> ForecastRequest {
    ForecastRequest::new(52.27, 6.87417)
        .with_current_weather()
        .with_hourly([HourlyVariable::Temperature2m, HourlyVariable::RelativeHumidity2m])
        .with_daily([DailyVariable::Sunrise, DailyVariable::Sunset])
}

fn create_test_client(mock_server: &MockServer) -> OpenMeteo {
    let config =
        ClientConfig::with_host(mock_server.uri()).with_timeout(Duration::from_millis(500));
    OpenMeteo::new(config).expect("mock server config must be valid")
}

async fn mount(mock_server: &MockServer, route: &str, response: ResponseTemplate, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(hits)
        .mount(mock_server)
        .await;
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn forecast_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "52.27"))
        .and(query_param("longitude", "6.87417"))
        .and(query_param("current_weather", "true"))
        .and(query_param("hourly", "temperature_2m,relativehumidity_2m"))
        .and(query_param("daily", "sunrise,sunset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let forecast = client.forecast(&sample_request()).await.expect("forecast must succeed");

    assert_eq!(forecast.latitude, 52.28);
    assert_eq!(forecast.timezone.as_deref(), Some("GMT"));

    let current = forecast.current_weather.expect("current weather requested");
    assert_eq!(current.weather_code, 3);

    let hourly = forecast.hourly.expect("hourly requested");
    assert_eq!(hourly.len(), 4);
    assert_eq!(hourly.floats(HourlyVariable::Temperature2m).len(), 4);

    let daily = forecast.daily.expect("daily requested");
    assert_eq!(daily.timestamps(DailyVariable::Sunset).len(), 1);
}

#[tokio::test]
async fn forecast_missing_variable_is_empty_series() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(200).set_body_json(sample_forecast_response()),
        1,
    )
    .await;

    let client = create_test_client(&mock_server);
    let forecast = client.forecast(&sample_request()).await.expect("forecast must succeed");

    // requested, but the response does not carry it
    let hourly = forecast.hourly.expect("hourly requested");
    assert!(hourly.integers(HourlyVariable::RelativeHumidity2m).is_empty());
}

#[tokio::test]
async fn request_url_carries_every_parameter() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(200).set_body_json(sample_forecast_response()),
        1,
    )
    .await;

    let request = sample_request().with_timezone("Europe/Amsterdam");
    let client = create_test_client(&mock_server);
    client.forecast(&request).await.expect("forecast must succeed");

    let received = mock_server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(received.len(), 1);

    let sent = QueryParams::from_url(&received[0].url);
    assert_eq!(sent, request.to_query());
    assert!(
        received[0]
            .url
            .query()
            .expect("query must be present")
            .contains("timezone=Europe%2FAmsterdam")
    );
}

#[tokio::test]
async fn shape_mismatch_is_validation_error() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(200).set_body_json(json!({ "latitude": 52.28 })),
        1,
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client.forecast(&sample_request()).await.unwrap_err();

    assert!(err.is_validation(), "unexpected error: {err}");
}

// ============================================================================
// Error scenarios
// ============================================================================

#[tokio::test]
async fn http_400_carries_reason_and_body() {
    let mock_server = MockServer::start().await;
    let body = json!({
        "error": true,
        "reason": "Latitude must be in range of -90 to 90°. Given: 91.0."
    });
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(400).set_body_json(body.clone()),
        1,
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client.forecast(&ForecastRequest::new(91.0, 0.0)).await.unwrap_err();

    match &err {
        OpenMeteoError::Api { status, message, body: raw } => {
            assert_eq!(*status, Some(400));
            assert!(message.contains("Latitude must be in range"));
            let raw: serde_json::Value = serde_json::from_str(raw).expect("body is the JSON sent");
            assert_eq!(raw, body);
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_404_plain_text() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(404).set_body_string("OMG PUPPIES!"),
        1,
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client.request(Endpoint::Forecast, &QueryParams::new()).await.unwrap_err();

    assert!(err.is_api());
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.body(), Some("OMG PUPPIES!"));
}

#[tokio::test]
async fn http_500_json() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(500).set_body_raw(r#"{"status":"nok"}"#, "application/json"),
        1,
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client.request(Endpoint::Forecast, &QueryParams::new()).await.unwrap_err();

    assert!(err.is_api());
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.body(), Some(r#"{"status":"nok"}"#));
}

#[tokio::test]
async fn unexpected_content_type_is_api_error() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
        1,
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client.forecast(&sample_request()).await.unwrap_err();

    assert!(err.is_api());
    assert!(err.to_string().contains("Unexpected response"));
    assert_eq!(err.body(), Some("<html>maintenance</html>"));
}

#[tokio::test]
async fn malformed_json_is_api_error() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(200).set_body_raw("{\"latitude\": ", "application/json"),
        1,
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client.forecast(&sample_request()).await.unwrap_err();

    assert!(err.is_api());
    assert!(err.to_string().contains("Malformed JSON"));
}

#[tokio::test]
async fn timeout_is_connection_error_without_retry() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(200)
            .set_body_json(sample_forecast_response())
            .set_delay(Duration::from_secs(3)),
        1,
    )
    .await;

    let config = ClientConfig::with_host(mock_server.uri()).with_timeout(Duration::from_millis(200));
    let client = OpenMeteo::new(config).expect("mock server config must be valid");

    let err = client.forecast(&sample_request()).await.unwrap_err();

    assert!(err.is_connection(), "unexpected error: {err}");
    assert!(err.to_string().contains("Timeout"));

    let received = mock_server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn unreachable_host_is_connection_error() {
    // Nothing listens on port 1.
    let config = ClientConfig::with_host("http://127.0.0.1:1").with_timeout(Duration::from_secs(2));
    let client = OpenMeteo::new(config).expect("config must be valid");

    let err = client.forecast(&sample_request()).await.unwrap_err();
    assert!(err.is_connection(), "unexpected error: {err}");
}

// ============================================================================
// Geocoding
// ============================================================================

#[tokio::test]
async fn geocoding_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Enschede"))
        .and(query_param("count", "10"))
        .and(query_param("format", "json"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": 2756071,
                "name": "Enschede",
                "latitude": 52.21833,
                "longitude": 6.89583,
                "elevation": 42.0,
                "feature_code": "PPLA2",
                "country_code": "NL",
                "country_id": 2750405,
                "country": "Netherlands",
                "timezone": "Europe/Amsterdam",
                "admin1": "Overijssel",
                "admin1_id": 2755634
            }],
            "generationtime_ms": 0.6
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let geocoding = client
        .geocoding(&GeocodingRequest::new("Enschede"))
        .await
        .expect("geocoding must succeed");

    assert_eq!(geocoding.results.len(), 1);
    assert_eq!(geocoding.results[0].country_code, "NL");
    assert_eq!(geocoding.results[0].admin1.as_deref(), Some("Overijssel"));
}

#[tokio::test]
async fn geocoding_without_matches() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/search",
        ResponseTemplate::new(200).set_body_json(json!({ "generationtime_ms": 0.2 })),
        1,
    )
    .await;

    let client = create_test_client(&mock_server);
    let geocoding = client
        .geocoding(&GeocodingRequest::new("x"))
        .await
        .expect("empty search must succeed");

    assert!(geocoding.results.is_empty());
}

// ============================================================================
// Session ownership
// ============================================================================

#[tokio::test]
async fn raw_request_with_borrowed_session() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })),
        2,
    )
    .await;

    let session = reqwest::Client::new();
    let mut client = OpenMeteo::with_session(ClientConfig::with_host(mock_server.uri()), session.clone())
        .expect("mock server config must be valid");

    let response = client
        .request(Endpoint::Forecast, &QueryParams::new())
        .await
        .expect("request must succeed");
    assert_eq!(response.get("status"), Some(&json!("ok")));

    assert!(!client.owns_session());
    assert!(!client.close());
    drop(client);

    // The caller's session is still usable after the client is gone.
    let status = session
        .get(format!("{}/v1/forecast", mock_server.uri()))
        .send()
        .await
        .expect("borrowed session must stay open")
        .status();
    assert!(status.is_success());
}

#[tokio::test]
async fn owned_session_is_created_lazily_and_closed() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })),
        2,
    )
    .await;

    let mut client = create_test_client(&mock_server);
    assert!(client.owns_session());
    assert!(!client.has_session());

    client
        .request(Endpoint::Forecast, &QueryParams::new())
        .await
        .expect("request must succeed");
    assert!(client.has_session());

    assert!(client.close());
    assert!(!client.has_session());

    // A closed client reopens on demand.
    client
        .request(Endpoint::Forecast, &QueryParams::new())
        .await
        .expect("request after close must succeed");
    assert!(client.has_session());
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(200).set_body_json(sample_forecast_response()),
        2,
    )
    .await;

    let client = create_test_client(&mock_server);
    let request = sample_request();
    let (a, b) = tokio::join!(client.forecast(&request), client.forecast(&request));

    assert_eq!(a.expect("first call must succeed"), b.expect("second call must succeed"));
}

#[tokio::test]
async fn works_through_trait_object() {
    let mock_server = MockServer::start().await;
    mount(
        &mock_server,
        "/v1/forecast",
        ResponseTemplate::new(200).set_body_json(sample_forecast_response()),
        1,
    )
    .await;

    let api: Box<dyn WeatherApi> = Box::new(create_test_client(&mock_server));
    let forecast = api.forecast(&sample_request()).await.expect("forecast must succeed");

    assert_eq!(forecast.elevation, 35.0);
}
