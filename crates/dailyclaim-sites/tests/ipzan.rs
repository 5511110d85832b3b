use dailyclaim_sites::ipzan;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/users-login"))
        .and(body_json(json!({"account": "acc-1", "source": "ipzan-home-one"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"token": "T0K"}})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/home/userWallet-find"))
        .and(header("authorization", "Bearer T0K"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"balance": 3.5}})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn claim_reports_balance() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/home/userWallet-receive"))
        .and(header("authorization", "Bearer T0K"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 200, "data": "领取成功"})))
        .expect(1)
        .mount(&server)
        .await;

    let report = ipzan::run(&["acc-1".to_string()], Some(&server.uri()))
        .await
        .unwrap();

    assert!(report.all_succeeded());
    assert_eq!(report.outcomes[0].message, "Claimed | balance: 3.5");
}

#[tokio::test]
async fn rejected_claim_still_reports_balance() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/home/userWallet-receive"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": -1, "message": "今日已领取"})),
        )
        .mount(&server)
        .await;

    let report = ipzan::run(&["acc-1".to_string()], Some(&server.uri()))
        .await
        .unwrap();

    assert_eq!(
        report.outcomes[0].message,
        "Claim failed: 今日已领取 | balance: 3.5"
    );
}

#[tokio::test]
async fn missing_token_is_a_login_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users-login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"token": null}})))
        .mount(&server)
        .await;

    let report = ipzan::run(&["acc-1".to_string()], Some(&server.uri()))
        .await
        .unwrap();

    assert!(!report.all_succeeded());
    assert!(report.outcomes[0].message.starts_with("Login failed"));
}
