use serde::Serialize;
use tracing::debug;

use crate::config::DiscordAlertConfig;
use crate::constants::alert;
use crate::error::{Result, VolbackError};

/// Discord Webhook 消息体
///
/// 线上所有字段都是可选的，缺省字段不参与序列化。
#[derive(Debug, Clone, Serialize, Default)]
pub struct DiscordMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<DiscordEmbed>>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct DiscordEmbed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<DiscordField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<DiscordFooter>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct DiscordField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct DiscordFooter {
    #[serde(rename = "text", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// 告警边界的输入：容器名、结果与有序日志
#[derive(Debug, Clone, Copy)]
pub struct AlertReport<'a> {
    pub container_name: &'a str,
    pub success: bool,
    pub lines: &'a [String],
}

/// Discord Webhook 告警客户端
///
/// 负责格式化与投递；投递失败由调用方记录日志，绝不影响备份流程。
#[derive(Debug, Clone)]
pub struct DiscordAlerter {
    client: reqwest::Client,
    username: String,
    webhooks: Vec<String>,
    only_on_error: bool,
}

impl DiscordAlerter {
    pub fn new(config: &DiscordAlertConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            username: config.username.clone(),
            webhooks: config.webhooks.clone(),
            only_on_error: config.only_on_error,
        }
    }

    /// "仅失败时发送"开关在告警边界生效，协调器不感知
    pub fn should_send(&self, success: bool) -> bool {
        !(success && self.only_on_error)
    }

    /// 发送一份备份结果告警
    pub async fn dispatch(&self, report: &AlertReport<'_>) -> Result<()> {
        self.validate_webhooks()?;
        let message = self.build_message(report)?;

        for url in &self.webhooks {
            let response = self.client.post(url).json(&message).send().await?;

            // Webhook 成功投递返回 204
            if response.status().as_u16() != 204 {
                let body = response.text().await.unwrap_or_default();
                return Err(VolbackError::Alert(body));
            }
            debug!(container = report.container_name, "告警已投递");
        }

        Ok(())
    }

    fn validate_webhooks(&self) -> Result<()> {
        if self.webhooks.is_empty() {
            return Err(VolbackError::Alert("没有可用的 Webhook 地址".to_string()));
        }

        for url in &self.webhooks {
            if !url.starts_with(alert::DISCORD_WEBHOOK_PREFIX) {
                return Err(VolbackError::Alert(format!("非法的 Webhook 地址: {url}")));
            }
        }

        Ok(())
    }

    fn build_message(&self, report: &AlertReport<'_>) -> Result<DiscordMessage> {
        let description = report.lines.join("\n");
        if description.len() >= alert::DISCORD_EMBED_LIMIT {
            return Err(VolbackError::Alert(format!(
                "告警内容超过 {} 字符上限",
                alert::DISCORD_EMBED_LIMIT
            )));
        }

        let color = if report.success {
            alert::DISCORD_SUCCESS_COLOR
        } else {
            alert::DISCORD_ERROR_COLOR
        };

        let fields = vec![
            DiscordField {
                name: Some("容器".to_string()),
                value: Some(report.container_name.to_string()),
                inline: Some(true),
            },
            DiscordField {
                name: Some("结果".to_string()),
                value: Some(if report.success { "成功" } else { "失败" }.to_string()),
                inline: Some(true),
            },
        ];

        let embed = DiscordEmbed {
            title: Some("备份结果".to_string()),
            description: Some(description),
            color: Some(color),
            fields: Some(fields),
            ..Default::default()
        };

        let username = if self.username.is_empty() {
            None
        } else {
            Some(self.username.clone())
        };

        Ok(DiscordMessage {
            username,
            content: None,
            embeds: Some(vec![embed]),
        })
    }
}
