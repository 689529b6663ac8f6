use serde_json::json;
use taskdesk::domain::{Credentials, Priority, TaskDraft, TaskStatus, fields};
use taskdesk::error::Error;
use taskdesk::services::{ApiClient, TaskScope};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn credentials() -> Credentials {
    Credentials {
        email: "ana@example.com".into(),
        password: "secreto".into(),
    }
}

#[tokio::test]
async fn test_login_never_sends_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "ana@example.com", "password": "secreto"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-1",
            "id": 7,
            "name": "Ana",
            "email": "ana@example.com",
            "roles": ["USER"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client");
    api.set_token(Some("stale".into()));
    let session = api.login(&credentials()).await.expect("login").into_session();
    assert_eq!(session.token, "jwt-1");
    assert_eq!(session.user.display_name(), "Ana");

    let received: Vec<Request> = server.received_requests().await.expect("recording");
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_task_lists_carry_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/assigned"))
        .and(header("authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 3,
                "title": "Revisar backups",
                "description": "Semanal",
                "status": "IN_PROGRESS",
                "assignedUser": {"id": 7, "name": "Ana"},
                "lastModified": "2024-05-02T10:15:00"
            },
            {"id": 4, "title": "Sin responsable", "status": "PENDING"}
        ])))
        .mount(&server)
        .await;

    let api = ApiClient::new(&format!("{}/", server.uri())).expect("client");
    api.set_token(Some("jwt-1".into()));
    let tasks = api.tasks(TaskScope::Assigned).await.expect("tasks");
    assert_eq!(tasks.len(), 2);

    let row = tasks[0].to_row();
    assert_eq!(row.display(fields::ESTADO), "En progreso");
    assert_eq!(row.display(fields::RESPONSABLE), "Ana");
    assert_eq!(row.display(fields::FECHA_LIMITE), "02/05/2024");
    assert_eq!(row.display(fields::PRIORIDAD), Priority::Alta.label());

    let unassigned = tasks[1].to_row();
    assert_eq!(unassigned.display(fields::RESPONSABLE), "Sin asignar");
}

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Usuario no encontrado"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/mine"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client");

    let err = api.login(&credentials()).await.expect_err("rejected");
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Usuario no encontrado");

    let err = api.tasks(TaskScope::Mine).await.expect_err("forbidden");
    assert!(matches!(err, Error::Api { status: 403, ref message } if message == "Forbidden"));
}

#[tokio::test]
async fn test_update_and_delete_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tasks/3"))
        .and(header_exists("authorization"))
        .and(body_json(json!({
            "title": "Revisar backups",
            "description": "Diario",
            "status": "COMPLETED",
            "assignedUserId": 7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "title": "Revisar backups",
            "description": "Diario",
            "status": "COMPLETED"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client");
    api.set_token(Some("jwt-1".into()));

    let draft = TaskDraft {
        id: Some(3),
        nombre: " Revisar backups ".into(),
        prioridad: Priority::Critica,
        estado: TaskStatus::Completed,
        responsable: Some(taskdesk::domain::AssignedUser {
            id: 7,
            name: "Ana".into(),
        }),
        fecha_limite: "01/06/2024".into(),
        descripcion: "Diario".into(),
    };
    assert!(draft.validate().is_empty());

    let task = api.update_task(3, &draft.to_payload()).await.expect("update");
    assert_eq!(task.status, "COMPLETED");

    api.delete_task(3).await.expect("delete");
}
