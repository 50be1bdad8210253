#[cfg(test)]
mod tests {
    use crate::clock::FixedClock;
    use crate::handlers::BookingState;
    use crate::logic::{BookingService, MSG_DATE_REQUIRED, MSG_INVALID_DATE};
    use crate::routes::routes;
    use crate::slots::BusinessHours;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use chrono::NaiveDate;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use slotbook_db::{AppointmentRepository, DbClient, SqlAppointmentRepository};
    use slotbook_mailer::Notifier;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app() -> Router {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        let repository = SqlAppointmentRepository::new(client);
        repository.init_schema().await.unwrap();
        let service = BookingService::new(
            repository,
            BusinessHours::default(),
            Arc::new(FixedClock(NaiveDate::from_ymd_opt(2098, 12, 31).unwrap())),
            Notifier::disabled(),
        );
        routes(Arc::new(BookingState {
            service,
            expose_error_details: false,
        }))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn booking(time: &str) -> Value {
        json!({
            "customerName": "Ada Lovelace",
            "customerEmail": "ada@example.com",
            "appointmentDate": "2099-01-01",
            "appointmentTime": time
        })
    }

    #[tokio::test]
    async fn test_get_availability_handler() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/available-slots/2099-01-01", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2099-01-01");
        assert_eq!(body["totalSlots"], 16);
        assert_eq!(body["availableCount"], 16);
        assert_eq!(body["bookedSlots"], 0);
        assert_eq!(body["availableSlots"][15], "16:30");
    }

    #[tokio::test]
    async fn test_availability_errors() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/available-slots", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MSG_DATE_REQUIRED);

        let (status, body) = send(&app, Method::GET, "/available-slots/01-01-2099", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MSG_INVALID_DATE);
    }

    #[tokio::test]
    async fn test_create_appointment_handler() {
        let app = app().await;
        let (status, body) = send(&app, Method::POST, "/create", Some(booking("09:00"))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Appointment created successfully");
        assert_eq!(body["appointment"]["status"], "confirmed");
        assert_eq!(body["appointment"]["duration"], 30);
        assert_eq!(body["appointment"]["appointmentDate"], "2099-01-01");
        assert!(body["appointment"]["bookingId"]
            .as_str()
            .unwrap()
            .starts_with("BK"));
        assert!(body["appointment"].get("notes").is_none());

        let (status, body) = send(&app, Method::POST, "/create", Some(booking("09:00"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "This time slot is already booked");
        assert_eq!(body["kind"], "conflict");
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let app = app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/create")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_appointment_handler() {
        let app = app().await;
        let (_, created) = send(&app, Method::POST, "/create", Some(booking("10:00"))).await;
        let id = created["appointment"]["bookingId"].as_str().unwrap().to_string();

        let (status, body) = send(&app, Method::GET, &format!("/booking/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["appointment"]["bookingId"], id.as_str());
        assert!(body.get("message").is_none());

        let (status, body) = send(&app, Method::GET, "/booking/BK404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Appointment not found");
    }

    #[tokio::test]
    async fn test_update_and_cancel_handlers() {
        let app = app().await;
        let (_, created) = send(&app, Method::POST, "/create", Some(booking("11:00"))).await;
        let id = created["appointment"]["bookingId"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/update/{}", id),
            Some(json!({ "notes": "Second floor" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Appointment updated successfully");
        assert_eq!(body["appointment"]["notes"], "Second floor");
        assert_eq!(body["appointment"]["appointmentTime"], "11:00");

        // No body at all is a cancel without a reason.
        let (status, body) = send(&app, Method::PUT, &format!("/cancel/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Appointment cancelled successfully");
        assert_eq!(body["appointment"]["status"], "cancelled");
        assert_eq!(body["appointment"]["notes"], "Cancelled by user");

        let (status, _) = send(&app, Method::PUT, &format!("/cancel/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/update/{}", id),
            Some(json!({ "notes": "too late" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cannot update a cancelled appointment");
    }

    #[tokio::test]
    async fn test_list_appointments_handler() {
        let app = app().await;
        send(&app, Method::POST, "/create", Some(booking("09:00"))).await;
        send(&app, Method::POST, "/create", Some(booking("09:30"))).await;

        let (status, body) = send(&app, Method::GET, "/all?page=1&limit=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["appointments"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::GET, "/all?limit=-1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/all?status=unknown", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
