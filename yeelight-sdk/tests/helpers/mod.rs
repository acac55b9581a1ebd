//! A simulated Yeelight bulb that keeps its own state

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

use yeelight_sdk::api::{ApiError, PROPERTIES};
use yeelight_sdk::{
    BoxedStream, BridgeConfig, ChannelConfig, Connector, Endpoint, LightRegistry, LineError,
};

/// In-memory bulb answering commands the way firmware does
pub struct FakeLight {
    values: Mutex<Vec<String>>,
    unsupported: Vec<&'static str>,
    reachable: AtomicBool,
    push_after_ack: AtomicBool,
    dials: AtomicU32,
    requests: AtomicU32,
    methods: Mutex<Vec<String>>,
}

impl FakeLight {
    pub fn new() -> Arc<Self> {
        Self::with_unsupported(Vec::new())
    }

    /// A bulb that answers the given methods with an error object
    pub fn with_unsupported(unsupported: Vec<&'static str>) -> Arc<Self> {
        let mut values = vec![String::new(); PROPERTIES.len()];
        values[0] = "off".to_string();
        values[1] = "100".to_string();
        values[2] = "4000".to_string();
        values[6] = "2".to_string();
        values[11] = "fake".to_string();

        Arc::new(Self {
            values: Mutex::new(values),
            unsupported,
            reachable: AtomicBool::new(true),
            push_after_ack: AtomicBool::new(false),
            dials: AtomicU32::new(0),
            requests: AtomicU32::new(0),
            methods: Mutex::new(Vec::new()),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        let light = Self::new();
        light.reachable.store(false, Ordering::SeqCst);
        light
    }

    /// Emit a `props` push right after every acknowledged command
    pub fn push_after_ack(&self) {
        self.push_after_ack.store(true, Ordering::SeqCst);
    }

    pub fn set_value(&self, property: &str, value: &str) {
        let index = property_index(property);
        self.values.lock().unwrap()[index] = value.to_string();
    }

    pub fn value(&self, property: &str) -> String {
        self.values.lock().unwrap()[property_index(property)].clone()
    }

    pub fn dials(&self) -> u32 {
        self.dials.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn methods(&self) -> Vec<String> {
        self.methods.lock().unwrap().clone()
    }

    /// Apply one request, returning the reply and an optional push
    fn handle(&self, request: &Value) -> (Value, Option<Value>) {
        let id = request["id"].clone();
        let method = request["method"].as_str().unwrap_or_default().to_string();
        let params = request["params"].as_array().cloned().unwrap_or_default();
        self.methods.lock().unwrap().push(method.clone());

        if self.unsupported.contains(&method.as_str()) {
            let reply = json!({"id": id, "error": {"code": -1, "message": "method not supported"}});
            return (reply, None);
        }

        if method == "get_prop" {
            let values = self.values.lock().unwrap();
            let result: Vec<Value> = params
                .iter()
                .map(|p| {
                    p.as_str()
                        .and_then(|name| PROPERTIES.iter().position(|known| *known == name))
                        .map(|i| Value::String(values[i].clone()))
                        .unwrap_or_else(|| Value::String(String::new()))
                })
                .collect();
            return (json!({"id": id, "result": result}), None);
        }

        let mut changed = serde_json::Map::new();
        {
            let mut values = self.values.lock().unwrap();
            let power_on = values[property_index("power")] == "on";
            let mut set = |property: &str, value: String| {
                values[property_index(property)] = value.clone();
                changed.insert(property.to_string(), Value::String(value));
            };
            let text = |i: usize| match params.get(i) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };

            match method.as_str() {
                "set_power" => set("power", text(0)),
                "toggle" => {
                    let next = if power_on { "off" } else { "on" };
                    set("power", next.to_string());
                }
                "set_bright" => set("bright", text(0)),
                "set_ct_abx" => {
                    set("ct", text(0));
                    set("color_mode", "2".to_string());
                }
                "set_rgb" => {
                    set("rgb", text(0));
                    set("color_mode", "1".to_string());
                }
                "set_hsv" => {
                    set("hue", text(0));
                    set("sat", text(1));
                    set("color_mode", "3".to_string());
                }
                "set_name" => set("name", text(0)),
                "start_cf" => set("flowing", "1".to_string()),
                "stop_cf" => set("flowing", "0".to_string()),
                _ => {}
            }
        }

        let push = if self.push_after_ack.load(Ordering::SeqCst) && !changed.is_empty() {
            Some(json!({"method": "props", "params": changed}))
        } else {
            None
        };
        (json!({"id": id, "result": ["ok"]}), push)
    }
}

fn property_index(property: &str) -> usize {
    PROPERTIES
        .iter()
        .position(|p| *p == property)
        .unwrap_or_else(|| panic!("unknown property {property}"))
}

async fn serve(light: Arc<FakeLight>, stream: DuplexStream) {
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        light.requests.fetch_add(1, Ordering::SeqCst);
        let request: Value = serde_json::from_str(&line).unwrap_or(Value::Null);
        let (reply, push) = light.handle(&request);

        let mut out = format!("{reply}\r\n");
        if let Some(push) = push {
            out.push_str(&format!("{push}\r\n"));
        }
        if writer.write_all(out.as_bytes()).await.is_err() {
            break;
        }
    }
}

pub struct FakeConnector {
    pub light: Arc<FakeLight>,
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(
        &self,
        _endpoint: &Endpoint,
        _timeout: Duration,
    ) -> Result<BoxedStream, LineError> {
        self.light.dials.fetch_add(1, Ordering::SeqCst);
        if !self.light.reachable.load(Ordering::SeqCst) {
            return Err(LineError::Dial("connection refused".to_string()));
        }
        let (client, server) = tokio::io::duplex(8192);
        tokio::spawn(serve(self.light.clone(), server));
        Ok(Box::new(client))
    }
}

pub fn test_config() -> BridgeConfig {
    BridgeConfig::new().with_channel(ChannelConfig::immediate())
}

/// A registry whose every light is `light`
pub fn registry_with(light: &Arc<FakeLight>, config: BridgeConfig) -> LightRegistry {
    LightRegistry::with_connector(
        config,
        Arc::new(FakeConnector {
            light: light.clone(),
        }),
    )
    .expect("valid config")
}

pub fn is_rejected(err: &yeelight_sdk::SdkError) -> bool {
    matches!(err, yeelight_sdk::SdkError::Api(ApiError::Rejected(_)))
}
