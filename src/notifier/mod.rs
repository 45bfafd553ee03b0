use std::fmt;

mod message;
mod telegram;
use std::sync::Arc;

pub use self::{message::render, telegram::Telegram};

use actix::prelude::*;
use secstr::SecUtf8;

#[derive(Debug, Clone, Message)]
#[rtype(result = "()")]
pub struct Notification {
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_token: Option<SecUtf8>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_url: String,
    pub disable_web_page_preview: bool,
}

#[derive(Clone)]
pub struct Notifier {
    telegram: Option<Arc<Telegram>>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Debug)]
        struct Disabled;

        f.debug_struct("Notifier")
            .field(
                "telegram",
                match &self.telegram {
                    Some(telegram) => &telegram.chat_id,
                    None => &Disabled,
                },
            )
            .finish()
    }
}

impl Notifier {
    pub fn new(config: Config) -> Self {
        let http = Arc::new(awc::Client::default());
        let Config {
            telegram_token,
            telegram_chat_id,
            telegram_api_url,
            disable_web_page_preview,
        } = config;
        let telegram = telegram_token.and_then(|token| {
            telegram_chat_id.map(|chat_id| {
                Arc::new(Telegram::new(
                    http,
                    &telegram_api_url,
                    &token,
                    chat_id,
                    disable_web_page_preview,
                ))
            })
        });
        if telegram.is_none() {
            tracing::warn!("Telegram token or chat id is not set, notifications will be dropped");
        }
        Self { telegram }
    }
}

impl Actor for Notifier {
    type Context = Context<Self>;
}

impl Handler<Notification> for Notifier {
    type Result = <Notification as Message>::Result;

    fn handle(&mut self, msg: Notification, ctx: &mut Self::Context) -> Self::Result {
        let Notification { text } = msg;
        match &self.telegram {
            Some(telegram) => {
                ctx.spawn(telegram.clone().notify(text).into_actor(self));
            }
            None => tracing::debug!("Dropping notification, Telegram is not configured"),
        }
    }
}
