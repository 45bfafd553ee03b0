use actix::Recipient;
use actix_web::{web, HttpResponse, Resource};

use crate::{
    http::Webhook,
    notifier::{self, Notification},
};

pub fn resource() -> Resource {
    web::resource("/")
        .route(web::post().to(gitlab_hook))
        .default_service(web::to(method_not_allowed))
}

pub async fn gitlab_hook(
    Webhook(event): Webhook,
    notifier: web::Data<Recipient<Notification>>,
) -> &'static str {
    let kind = event.kind();
    match notifier::render(&event) {
        Some(text) => {
            tracing::info!(kind, "Queueing notification");
            notifier.do_send(Notification { text });
        }
        None => tracing::info!(kind, "Event suppressed"),
    }

    "OK"
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().finish()
}

#[cfg(test)]
mod tests {
    use actix::prelude::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Actor for Recorder {
        type Context = Context<Self>;
    }

    impl Handler<Notification> for Recorder {
        type Result = ();

        fn handle(&mut self, msg: Notification, _: &mut Self::Context) {
            self.0.push(msg.text);
        }
    }

    #[derive(Message)]
    #[rtype(result = "Vec<String>")]
    struct Drain;

    impl Handler<Drain> for Recorder {
        type Result = MessageResult<Drain>;

        fn handle(&mut self, _: Drain, _: &mut Self::Context) -> Self::Result {
            MessageResult(std::mem::take(&mut self.0))
        }
    }

    async fn post(
        recorder: &Addr<Recorder>,
        body: impl Into<actix_web::web::Bytes>,
    ) -> (StatusCode, Vec<String>) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(recorder.clone().recipient::<Notification>()))
                .service(resource()),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(("Content-Type", "application/json"))
            .set_payload(body)
            .to_request();
        let status = test::call_service(&app, req).await.status();
        (status, recorder.send(Drain).await.unwrap())
    }

    #[actix_web::test]
    async fn push_is_relayed() {
        let recorder = Recorder::default().start();
        let body = json!({
            "object_kind": "push",
            "user_username": "alice",
            "ref": "refs/heads/feature/login page",
            "total_commits_count": 2,
            "project": {
                "name": "widgets",
                "web_url": "https://gitlab.example.com/team/widgets"
            }
        });

        let (status, sent) = post(&recorder, body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            sent,
            vec!["🔨 New push by alice to widgets.\n\
                  Target branch: feature/login page\n\
                  https://gitlab.example.com/team/widgets/-/tree/feature%2Flogin+page"
                .to_string()]
        );
    }

    #[actix_web::test]
    async fn suppressed_events_still_succeed() {
        let recorder = Recorder::default().start();

        for body in [
            json!({ "object_kind": "push", "total_commits_count": 0 }),
            json!({ "object_kind": "merge_request", "object_attributes": { "action": "update" } }),
            json!({ "object_kind": "build", "build_status": "running" }),
            json!({ "object_kind": "pipeline" }),
        ] {
            let (status, sent) = post(&recorder, body.to_string()).await;
            assert_eq!(status, StatusCode::OK);
            assert!(sent.is_empty(), "{}", body);
        }
    }

    #[actix_web::test]
    async fn malformed_body_is_bad_request() {
        let recorder = Recorder::default().start();

        let (status, sent) = post(&recorder, "{\"object_kind\": ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(sent.is_empty());
    }

    #[actix_web::test]
    async fn other_methods_are_not_allowed() {
        let recorder = Recorder::default().start();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(recorder.recipient::<Notification>()))
                .service(resource()),
        )
        .await;

        for req in [
            test::TestRequest::get().uri("/").to_request(),
            test::TestRequest::put().uri("/").to_request(),
            test::TestRequest::delete().uri("/").to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        }
    }

    #[actix_web::test]
    async fn oversized_body_is_rejected() {
        let recorder = Recorder::default().start();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(recorder.clone().recipient::<Notification>()))
                .app_data(web::PayloadConfig::new(16))
                .service(resource()),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/")
            .set_payload(json!({ "object_kind": "note" }).to_string())
            .to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(recorder.send(Drain).await.unwrap().is_empty());
    }
}
