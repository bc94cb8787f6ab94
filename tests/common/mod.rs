// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use serde_json::json;
use sls::config::Config;
use sls::models::Token;
use sls::services::{HttpResponse, Transport, TransportError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const API_URL: &str = "https://api.test/v3";
pub const TOKEN_URL: &str = "https://api.test/oauth/token";

/// In-memory Strava: serves scripted activity pages, gear and token
/// refreshes, and records every request it sees.
#[derive(Default)]
pub struct MockStrava {
    /// Activities returned for `after=0`, in API order (newest first)
    pub activities: Vec<serde_json::Value>,
    pub gear: HashMap<String, String>,
    /// Page number answered with a rate-limit fault payload
    pub fault_page: Option<u32>,
    /// Gear id answered with a not-found fault payload
    pub fault_gear: Option<String>,
    /// Body returned by the token endpoint
    pub refresh_body: Option<String>,
    pub delay: Duration,

    pub gets: AtomicUsize,
    pub posts: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub seen_after: Mutex<Vec<i64>>,
    pub seen_gear: Mutex<Vec<String>>,
    pub seen_bearer: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockStrava {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(2),
            ..Default::default()
        }
    }

    pub fn with_activities(mut self, activities: Vec<serde_json::Value>) -> Self {
        self.activities = activities;
        self
    }

    pub fn with_gear(mut self, id: &str, name: &str) -> Self {
        self.gear.insert(id.to_string(), name.to_string());
        self
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn posts(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn seen_after(&self) -> Vec<i64> {
        self.seen_after.lock().unwrap().clone()
    }

    pub fn seen_gear(&self) -> Vec<String> {
        let mut ids = self.seen_gear.lock().unwrap().clone();
        ids.sort();
        ids
    }

    fn list(&self, url: &str) -> HttpResponse {
        let after: i64 = query_param(url, "after").unwrap_or(0);
        let page: u32 = query_param(url, "page").unwrap_or(1);
        let per_page: usize = query_param(url, "per_page").unwrap_or(30);
        self.seen_after.lock().unwrap().push(after);

        if self.fault_page == Some(page) {
            return fault(429, "Rate Limit Exceeded");
        }

        let matching: Vec<&serde_json::Value> = self
            .activities
            .iter()
            .filter(|a| start_epoch(a) > after)
            .collect();
        let start = (page as usize - 1) * per_page;
        let items: Vec<&serde_json::Value> =
            matching.into_iter().skip(start).take(per_page).collect();
        ok(json!(items))
    }

    fn gear(&self, url: &str) -> HttpResponse {
        let id = url.rsplit('/').next().unwrap_or_default().to_string();
        self.seen_gear.lock().unwrap().push(id.clone());

        if self.fault_gear.as_deref() == Some(id.as_str()) {
            return fault(404, "Record Not Found");
        }
        match self.gear.get(&id) {
            Some(name) => ok(json!({"id": id, "name": name, "resource_state": 2})),
            None => fault(404, "Record Not Found"),
        }
    }
}

#[async_trait]
impl Transport for MockStrava {
    async fn get(&self, url: &str, bearer: &str) -> Result<HttpResponse, TransportError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.seen_bearer.lock().unwrap().push(bearer.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let path = url.strip_prefix(API_URL).unwrap_or(url);
        if path.starts_with("/athlete/activities") {
            Ok(self.list(url))
        } else if path.starts_with("/gear/") {
            Ok(self.gear(url))
        } else {
            Err(TransportError(format!("unexpected GET {}", url)))
        }
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        self.posts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay * 5).await;
        assert_eq!(url, TOKEN_URL);
        assert!(form.contains(&("grant_type", "refresh_token")));
        match &self.refresh_body {
            Some(body) => Ok(HttpResponse {
                status: 200,
                body: body.clone().into_bytes(),
            }),
            None => Err(TransportError("no refresh scripted".to_string())),
        }
    }
}

fn query_param<T: std::str::FromStr>(url: &str, name: &str) -> Option<T> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(k, _)| *k == name)
        .and_then(|(_, v)| v.parse().ok())
}

fn start_epoch(activity: &serde_json::Value) -> i64 {
    activity["start_date"]
        .as_str()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.timestamp())
        .unwrap_or(0)
}

fn ok(body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status: 200,
        body: body.to_string().into_bytes(),
    }
}

fn fault(status: u16, message: &str) -> HttpResponse {
    HttpResponse {
        status,
        body: json!({"message": message, "errors": []})
            .to_string()
            .into_bytes(),
    }
}

/// Activity JSON as the list endpoint returns it.
#[allow(dead_code)]
pub fn activity(id: i64, start_epoch: i64, gear_id: Option<&str>) -> serde_json::Value {
    let start = chrono::DateTime::from_timestamp(start_epoch, 0)
        .unwrap()
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    json!({
        "resource_state": 2,
        "id": id,
        "name": format!("Activity {}", id),
        "type": "Ride",
        "distance": 10000.0,
        "moving_time": 1800,
        "total_elevation_gain": 100.0,
        "start_date": start,
        "start_date_local": start,
        "gear_id": gear_id,
        "device_watts": false,
    })
}

/// `count` activities one hour apart starting at `first_epoch`, newest
/// first, cycling through `gear`.
#[allow(dead_code)]
pub fn activities(count: usize, first_epoch: i64, gear: &[&str]) -> Vec<serde_json::Value> {
    let mut list: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            let g = if gear.is_empty() {
                None
            } else {
                Some(gear[i % gear.len()])
            };
            activity(1000 + i as i64, first_epoch + 3600 * i as i64, g)
        })
        .collect();
    list.reverse();
    list
}

#[allow(dead_code)]
pub fn write_token(dir: &Path, expires_at: i64) {
    let token = Token {
        access_token: "access-0".to_string(),
        expires_at,
        refresh_token: "refresh-0".to_string(),
    };
    std::fs::write(dir.join("token"), serde_json::to_vec(&token).unwrap()).unwrap();
}

#[allow(dead_code)]
pub fn valid_token(dir: &Path) {
    write_token(dir, chrono::Utc::now().timestamp() + 6 * 3600);
}

#[allow(dead_code)]
pub fn refresh_response(access_token: &str) -> String {
    json!({
        "token_type": "Bearer",
        "access_token": access_token,
        "expires_at": chrono::Utc::now().timestamp() + 6 * 3600,
        "expires_in": 21600,
        "refresh_token": "refresh-1",
    })
    .to_string()
}

/// Config pointing at the mock endpoints with token and caches in `dir`.
#[allow(dead_code)]
pub fn test_config(dir: &Path) -> Config {
    Config {
        token_path: dir.join("token"),
        activity_cache: dir.join("activities.json"),
        gear_cache: dir.join("gear.json"),
        concurrency: 8,
        per_page: 100,
        api_url: API_URL.to_string(),
        token_url: TOKEN_URL.to_string(),
        ..Config::default()
    }
}
