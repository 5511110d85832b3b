use dailyclaim_sites::ikuuu::{self, Account};
use serde_json::json;
use wiremock::matchers::{body_json, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn account() -> Account {
    Account {
        email: "me@example.com".into(),
        password: "hunter2".into(),
    }
}

#[tokio::test]
async fn login_checkin_and_traffic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "me@example.com", "passwd": "hunter2"})))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "uid=7; path=/")
                .append_header("set-cookie", "key=abc; path=/; HttpOnly")
                .set_body_json(json!({"ret": 1, "msg": "登录成功"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/checkin"))
        .and(header_regex("cookie", "uid=7"))
        .and(header_regex("cookie", "key=abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ret": 1, "msg": "你获得了 512MB 流量"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<li>今日已用：20MB</li>\n  <span class=\"counter\">99.5</span> GB\n",
        ))
        .mount(&server)
        .await;

    let report = ikuuu::run(&[account()], Some(&server.uri())).await.unwrap();

    assert!(report.all_succeeded());
    assert_eq!(
        report.outcomes[0].message,
        "你获得了 512MB 流量 | used today: 20MB | remaining: 99.5GB"
    );
}

#[tokio::test]
async fn login_without_cookie_skips_the_account() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ret": 0, "msg": "邮箱或者密码错误"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/checkin"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = ikuuu::run(&[account()], Some(&server.uri())).await.unwrap();

    assert_eq!(report.success_count(), 0);
    assert_eq!(report.outcomes[0].message, "Login failed: 邮箱或者密码错误");
}

#[tokio::test]
async fn rejected_checkin_still_reports_traffic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "uid=7; path=/")
                .set_body_json(json!({"ret": 1, "msg": "登录成功"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/checkin"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"ret": 0, "msg": "系统繁忙"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header_regex("cookie", "uid=7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<li>今日已用: 0B</li>"))
        .mount(&server)
        .await;

    let report = ikuuu::run(&[account()], Some(&server.uri())).await.unwrap();

    assert!(!report.all_succeeded());
    assert_eq!(
        report.outcomes[0].message,
        "iKuuu API error: check-in failed: 系统繁忙 | used today: 0B | remaining: unavailable"
    );
}

#[tokio::test]
async fn checkin_without_message_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "uid=7; path=/")
                .set_body_json(json!({"ret": 1})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/checkin"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = ikuuu::IkuuuClient::new().unwrap().with_base(&server.uri());
    client.login("me@example.com", "hunter2").await.unwrap();
    let err = client.check_in().await.unwrap_err().to_string();
    assert!(err.contains("502"), "{err}");
    assert!(err.contains("no message"), "{err}");
}
