use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};
use secrecy::SecretString;
use tokio::runtime::Builder;
use whoop_client::http_client::ReqwestWhoopClient;
use whoop_client::token::StaticToken;
use whoop_client::{WhoopClient, get_day_data};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bench_get_day_data(c: &mut Criterion) {
    let rt = Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");

    let server = rt.block_on(async {
        let server = MockServer::start().await;
        let cycle = serde_json::json!({"records": [{"id": 1, "start": "2026-02-20T07:00:00.000Z"}]});
        Mock::given(method("GET"))
            .and(path("/cycle"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cycle))
            .mount(&server)
            .await;
        // 200 small sleep records to exercise decoding of a realistic page
        let sleeps: Vec<_> = (0..200)
            .map(|i| serde_json::json!({"id": format!("s{i}"), "nap": i % 3 == 0}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/activity/sleep"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"records": sleeps})))
            .mount(&server)
            .await;
        for p in ["/recovery", "/activity/workout"] {
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"records": []})))
                .mount(&server)
                .await;
        }
        server
    });

    let client: Arc<dyn WhoopClient> = Arc::new(
        ReqwestWhoopClient::new(
            &server.uri(),
            Arc::new(StaticToken::new(SecretString::new("tok".into()))),
            Duration::from_secs(5),
        )
        .expect("client"),
    );
    let date = NaiveDate::from_ymd_opt(2026, 2, 20).expect("date");

    c.bench_function("get_day_data", |b| {
        b.to_async(&rt).iter(|| {
            let client = client.clone();
            async move {
                get_day_data(client, date).await.expect("day");
            }
        })
    });
}

criterion_group!(benches, bench_get_day_data);
criterion_main!(benches);
