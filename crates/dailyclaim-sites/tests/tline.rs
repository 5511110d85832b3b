use dailyclaim_sites::tline::{register_sign, TLineRegistrator, TLineSettings};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> TLineSettings {
    TLineSettings {
        base: server.uri(),
        key: "k3y".into(),
        email_domain: "example.org".into(),
        proxy: None,
    }
}

#[tokio::test]
async fn register_sends_signed_form() {
    let server = MockServer::start().await;
    let sign = register_sign("abcd1234", "Passw0rdXyZ1", "k3y");
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_string_contains("name=abcd1234"))
        .and(body_string_contains("email=abcd1234%40example.org"))
        .and(body_string_contains(format!("sign={sign}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ret": 1, "msg": "注册成功"})))
        .expect(1)
        .mount(&server)
        .await;

    let registrator = TLineRegistrator::new(settings(&server)).unwrap();
    registrator.register("abcd1234", "Passw0rdXyZ1").await.unwrap();
}

#[tokio::test]
async fn full_run_collects_links() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ret": 1, "msg": "ok"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "uid=9; path=/")
                .set_body_json(json!({"ret": 1})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("cookie", "uid=9"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a data-clipboard-text="https://s.example/link/x?clash=1">Clash</a>
               <a data-clipboard-text="https://s.example/link/x?sub=3">V2Ray</a>"#,
        ))
        .mount(&server)
        .await;

    let registration = TLineRegistrator::new(settings(&server))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(registration.email.ends_with("@example.org"));
    let links = registration.links.as_ref().expect("links");
    assert_eq!(links.clash, "https://s.example/link/x?clash=1");
    assert_eq!(links.v2ray, "https://s.example/link/x?sub=3");
    assert!(registration.message().contains(&registration.password));
}

#[tokio::test]
async fn rejected_registration_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ret": 0, "msg": "邮箱已被注册"})),
        )
        .mount(&server)
        .await;

    let err = TLineRegistrator::new(settings(&server))
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("邮箱已被注册"));
}

#[tokio::test]
async fn login_without_cookie_keeps_the_registration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ret": 1, "msg": "ok"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ret": 0})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let registration = TLineRegistrator::new(settings(&server))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(registration.links.is_none());
    assert!(!registration.message().contains("subscription"));
}
