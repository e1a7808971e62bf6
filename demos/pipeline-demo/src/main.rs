use hyper::{Method, Uri};
use when_error_type::prelude::*;

const CHAIN_TOML: &str = r#"
[[stage]]
error_type = "TimeoutError"
handler = "retry_page"

[[stage]]
error_type = "DatabaseError"
handler = "json_503"

[[stage]]
error_type = "Error"
handler = "json_500"
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    // Declare the taxonomy in code, the chain in TOML.
    let timeout = ErrorClass::new("TimeoutError");
    let database = ErrorClass::new("DatabaseError");

    let registry = Registry::new()
        .class(timeout.clone())
        .class(database.clone())
        .handler(
            "retry_page",
            Handler::from_fn(|error, _req, _res, _next| async move {
                Ok(Res::builder()
                    .status(504)
                    .header("Retry-After", "1")
                    .text(format!("504 {}", error)))
            }),
        )
        .handler("json_503", respond_json(503))
        .handler("json_500", respond_json(500));

    let chain = registry.build(&ChainConfig::from_toml(CHAIN_TOML)?)?;
    println!("Built an error chain with {} stages", chain.len());
    println!();

    let samples = vec![
        timeout.construct("upstream took 30s")?,
        database.construct("connection pool exhausted")?,
        ErrorClass::new("ValidationError").construct("name is required")?,
        shared_error(std::io::Error::other("disk on fire")),
    ];

    for error in samples {
        let req = Req::new(Method::GET, Uri::from_static("/orders"));
        let res = Res::builder().empty();

        println!("dispatching: {}", error);
        match chain.handle(error, req, res, ErrorNext::end()).await {
            Outcome::Handled(response) => {
                println!("  -> {} {}", response.status_code(), response.body_text());
            }
            Outcome::Forwarded(error) => {
                println!("  -> unhandled, forwarded: {}", error);
            }
        }
        println!();
    }

    Ok(())
}
