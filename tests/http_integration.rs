// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP clients and the reconciliation core,
//! using wiremock as the controller.

use std::time::Duration;

use poolmath_lib::client::{DeviceClient, MeadowClient, PoolduinoClient};
use poolmath_lib::{Controller, ControllerConfig, Error, TransportError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn meadow_body(pump: u8, temp: f64) -> serde_json::Value {
    serde_json::json!({
        "Heating": false,
        "Pump": pump,
        "SwgPercent": 45,
        "ThermostatTarget": 29.5,
        "Timestamp": 1_719_243_000_u64,
        "Temp": temp,
        "Pressure": 14.2,
        "SwgCycleTimeOn": 1800,
        "SwgCycleTime": 620,
        "SwgCycleDuration": 3600,
        "PoolMathUserId": "abc123"
    })
}

fn test_config(server: &MockServer) -> ControllerConfig {
    ControllerConfig::new(server.address().ip().to_string(), server.address().port())
        .with_control_debounce(Duration::from_millis(50))
        .with_refresh_debounce(Duration::from_millis(50))
}

// ============================================================================
// MeadowClient
// ============================================================================

mod meadow_client {
    use super::*;

    #[tokio::test]
    async fn fetch_status_decodes_and_stamps_identity() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(meadow_body(2, 26.4)))
            .mount(&server)
            .await;

        let client =
            MeadowClient::new(server.address().ip().to_string(), server.address().port()).unwrap();

        let status = client.fetch_status().await.unwrap();
        assert_eq!(status.pump, 2);
        assert_eq!(status.temp, 26.4);
        assert_eq!(status.swg_percent, 45);
        assert_eq!(status.pool_math_user_id, "abc123");
        assert_eq!(status.address, server.address().ip().to_string());
        assert_eq!(status.port, server.address().port());
    }

    #[tokio::test]
    async fn controls_hit_path_encoded_routes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pump/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(meadow_body(2, 26.4)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/heater/true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(meadow_body(2, 26.4)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/thermostat/29.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(meadow_body(2, 26.4)))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            MeadowClient::new(server.address().ip().to_string(), server.address().port()).unwrap();

        use poolmath_lib::MeadowControl;
        let status = client
            .send_control(MeadowControl::PumpProgram(2))
            .await
            .unwrap();
        assert_eq!(status.pump, 2);

        client
            .send_control(MeadowControl::Heating(true))
            .await
            .unwrap();
        client
            .send_control(MeadowControl::ThermostatTarget(29.5))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn http_error_status_is_a_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client =
            MeadowClient::new(server.address().ip().to_string(), server.address().port()).unwrap();

        let err = client.fetch_status().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::Status { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client =
            MeadowClient::new(server.address().ip().to_string(), server.address().port()).unwrap();

        let err = client.fetch_status().await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_device_is_a_transport_error() {
        // A server that is started and immediately dropped leaves a port
        // nothing listens on.
        let address = {
            let server = MockServer::start().await;
            *server.address()
        };

        let client = MeadowClient::new(address.ip().to_string(), address.port()).unwrap();

        let err = client.fetch_status().await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}

// ============================================================================
// PoolduinoClient
// ============================================================================

mod poolduino_client {
    use super::*;

    fn poolduino_body() -> serde_json::Value {
        serde_json::json!({
            "heaterState": 1,
            "heaterTemp": 31.0,
            "systemMode": 2,
            "pumpProgram": 3,
            "swgPercent": 60,
            "swgCycleTimeOn": 900,
            "swgCycleTime": 450,
            "currentTemp": 27.8,
            "poolMathUserId": "user-1",
            "currentMinOfDay": 840
        })
    }

    #[tokio::test]
    async fn fetch_status_uses_the_info_route() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(poolduino_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            PoolduinoClient::new(server.address().ip().to_string(), server.address().port())
                .unwrap();

        let status = client.fetch_status().await.unwrap();
        assert_eq!(status.heater_state, 1);
        assert_eq!(status.pump_program, 3);
        assert_eq!(status.current_temp, 27.8);
        assert_eq!(status.current_min_of_day, 840);
    }

    #[tokio::test]
    async fn controls_hit_query_encoded_routes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pump"))
            .and(query_param("program", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(poolduino_body()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/heater"))
            .and(query_param("state", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(poolduino_body()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/swg"))
            .and(query_param("percent", "45"))
            .respond_with(ResponseTemplate::new(200).set_body_json(poolduino_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            PoolduinoClient::new(server.address().ip().to_string(), server.address().port())
                .unwrap();

        use poolmath_lib::PoolduinoControl;
        client
            .send_control(PoolduinoControl::PumpProgram(2))
            .await
            .unwrap();
        client
            .send_control(PoolduinoControl::HeaterMode(1))
            .await
            .unwrap();
        client
            .send_control(PoolduinoControl::SwgPercent(45))
            .await
            .unwrap();
    }
}

// ============================================================================
// Controller end-to-end
// ============================================================================

mod controller {
    use super::*;

    #[tokio::test]
    async fn pump_change_adopts_the_device_snapshot_and_notifies() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pump/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(meadow_body(2, 79.5)))
            .expect(1)
            .mount(&server)
            .await;

        let controller = Controller::meadow(&test_config(&server)).unwrap();
        let mut events = controller.subscribe();

        let status = controller.set_pump_program(2).await.unwrap();
        assert_eq!(status.pump, 2);
        assert_eq!(status.temp, 79.5);
        assert_eq!(controller.status(), status);

        let event = events.try_recv().unwrap();
        assert_eq!(event.status().pump, 2);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn failed_thermostat_change_rolls_back_and_surfaces_the_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/thermostat/85"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let controller = Controller::meadow(&test_config(&server)).unwrap();
        let before = controller.status();
        let mut events = controller.subscribe();

        let err = controller.set_thermostat_target(85.0).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::Status { status: 500, .. })
        ));

        // The thermostat target is back at its prior value, nothing else
        // moved, and the revert was announced.
        assert_eq!(controller.status(), before);
        let event = events.try_recv().unwrap();
        assert_eq!(event.status(), &before);
    }

    #[tokio::test]
    async fn rapid_swg_writes_issue_one_request_with_the_final_value() {
        let server = MockServer::start().await;

        // Only the last requested value may reach the device. The mock is
        // strict: any /swg/10 or /swg/20 request would not match and fail
        // the expect(1) verification on drop.
        Mock::given(method("GET"))
            .and(path("/swg/30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(meadow_body(1, 26.0)))
            .expect(1)
            .mount(&server)
            .await;

        let controller = Controller::meadow(&test_config(&server)).unwrap();

        let (a, b, c) = tokio::join!(
            controller.set_swg_percent(10),
            controller.set_swg_percent(20),
            controller.set_swg_percent(30),
        );

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert!(c.is_ok());
    }

    #[tokio::test]
    async fn refresh_suppresses_events_for_unchanged_snapshots() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(meadow_body(1, 26.0)))
            .mount(&server)
            .await;

        let controller = Controller::meadow(&test_config(&server)).unwrap();
        let mut events = controller.subscribe();

        controller.refresh().await.unwrap();
        controller.refresh().await.unwrap();

        // The first refresh changes the all-zero initial snapshot; the
        // second returns identical data and must stay silent.
        assert!(events.try_recv().is_ok());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn polling_picks_up_device_state() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(meadow_body(3, 25.0)))
            .mount(&server)
            .await;

        let config = test_config(&server).with_update_interval(Duration::from_secs(60));
        let controller = Controller::meadow(&config).unwrap();
        let mut events = controller.subscribe();

        controller.start_polling();

        // The first tick fires immediately; allow for the refresh debounce
        // window plus the round trip.
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("poll produced no event")
            .unwrap();
        assert_eq!(event.status().pump, 3);

        controller.stop_polling();
    }
}
