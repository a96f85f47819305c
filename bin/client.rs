// Course Catalog - REST demo client
//
// Drives the CRUD routes of a running catalog-server and prints every
// response: the full student lifecycle (list, create, fetch, update,
// delete), then a list-and-create pass over courses, instructors, and
// modules. Base URL comes from the first argument, defaulting to the
// local server.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Months, Utc};
use log::info;
use reqwest::{Client, Method};
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client")?;
        Ok(ApiClient {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get(&self, endpoint: &str) -> Result<String> {
        self.send(Method::GET, endpoint, None).await
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<String> {
        self.send(Method::POST, endpoint, Some(body)).await
    }

    async fn put(&self, endpoint: &str, body: Value) -> Result<String> {
        self.send(Method::PUT, endpoint, Some(body)).await
    }

    async fn delete(&self, endpoint: &str) -> Result<String> {
        self.send(Method::DELETE, endpoint, None).await
    }

    async fn send(&self, method: Method, endpoint: &str, body: Option<Value>) -> Result<String> {
        let url = self.url(endpoint);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("{} {} failed - is catalog-server running?", method, url))?;
        info!("{} {} - status {}", method, endpoint, response.status());

        response
            .text()
            .await
            .with_context(|| format!("failed to read response body from {}", url))
    }
}

/// Re-indents a JSON response for display; non-JSON bodies pass through.
fn format_json(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

fn print_json(raw: &str) {
    println!("{}", format_json(raw));
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

#[tokio::main]
async fn main() -> Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let client = ApiClient::new(base_url)?;
    let today = Utc::now().date_naive();

    banner("Student CRUD Demo");

    println!("\n1. GET all students:");
    print_json(&client.get("/students").await?);

    println!("\n2. POST - create new student:");
    print_json(
        &client
            .post(
                "/students",
                json!({
                    "firstName": "Test",
                    "lastName": "User",
                    "email": "test.user@demo.com",
                    "enrollmentDate": today.to_string(),
                }),
            )
            .await?,
    );

    println!("\n3. GET student by email:");
    print_json(&client.get("/students/test.user@demo.com").await?);

    println!("\n4. PUT - update student:");
    print_json(
        &client
            .put(
                "/students/test.user@demo.com",
                json!({ "firstName": "Updated" }),
            )
            .await?,
    );

    println!("\n5. DELETE student:");
    print_json(&client.delete("/students/test.user@demo.com").await?);

    banner("Course CRUD Demo");

    println!("\n6. GET all courses:");
    print_json(&client.get("/courses").await?);

    println!("\n7. POST - create new course:");
    let next_month = today
        .checked_add_months(Months::new(1))
        .unwrap_or(today)
        .to_string();
    print_json(
        &client
            .post(
                "/courses",
                json!({
                    "title": "Demo Course",
                    "description": "Demo Description",
                    "credits": 3,
                    "startDate": next_month,
                }),
            )
            .await?,
    );

    banner("Instructor CRUD Demo");

    println!("\n8. GET all instructors:");
    print_json(&client.get("/instructors").await?);

    println!("\n9. POST - create new instructor:");
    print_json(
        &client
            .post(
                "/instructors",
                json!({
                    "firstName": "Demo",
                    "lastName": "Teacher",
                    "expertise": 10,
                }),
            )
            .await?,
    );

    banner("Module CRUD Demo");

    println!("\n10. GET all modules:");
    print_json(&client.get("/modules").await?);

    println!("\n11. POST - create new module:");
    print_json(
        &client
            .post(
                "/modules",
                json!({
                    "title": "Demo Module",
                    "content": "Demo module content for testing",
                }),
            )
            .await?,
    );

    banner("REST API Client Demo Complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_endpoint() {
        let client = ApiClient::new("http://localhost:8080/api").unwrap();
        assert_eq!(
            client.url("/students/test.user@demo.com"),
            "http://localhost:8080/api/students/test.user@demo.com"
        );
    }

    #[test]
    fn test_format_json_pretty_prints_valid_json() {
        let formatted = format_json("{\"email\":\"ada@example.com\"}");
        assert_eq!(formatted, "{\n  \"email\": \"ada@example.com\"\n}");
    }

    #[test]
    fn test_format_json_passes_through_non_json() {
        assert_eq!(format_json("plain text"), "plain text");
    }
}
