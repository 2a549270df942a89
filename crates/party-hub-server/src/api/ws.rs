//! Party websocket API.
//!
//! One actor per connection. The client binds to a party with a subscribe
//! message and then receives that party's broadcasts until it disconnects
//! or re-subscribes elsewhere.

use actix::prelude::*;
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;

use crate::hub::{PartyOutbound, PartyServerMessage};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PartyClientMessage {
    Subscribe { code: String, name: String },
}

pub struct PartyWs {
    state: web::Data<AppState>,
    conn_id: u64,
}

impl PartyWs {
    pub fn new(state: web::Data<AppState>) -> Self {
        let conn_id = state.hub.next_conn_id();
        Self { state, conn_id }
    }

    fn send_message(&self, ctx: &mut ws::WebsocketContext<Self>, msg: &PartyServerMessage) {
        if let Ok(text) = serde_json::to_string(msg) {
            ctx.text(text);
        }
    }

    fn handle_subscribe(
        &mut self,
        code: String,
        name: String,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        let recipient = ctx.address().recipient::<PartyOutbound>();
        let reply = subscribe_connection(&self.state, self.conn_id, &code, &name, recipient);
        self.send_message(ctx, &reply);
    }
}

/// Resolve a subscribe request and return the reply to send.
///
/// An unknown code is rejected without touching the hub: no binding is
/// created and membership accounting stays untouched.
fn subscribe_connection(
    state: &AppState,
    conn_id: u64,
    code: &str,
    name: &str,
    recipient: Recipient<PartyOutbound>,
) -> PartyServerMessage {
    let party = match state.registry.get(code) {
        Ok(party) => party,
        Err(err) => {
            let message = match err {
                crate::error::EngineError::PartyNotFound { code } => {
                    format!("party not found: {code}")
                }
                other => format!("{other:?}"),
            };
            return PartyServerMessage::Error { message };
        }
    };

    let previous = state.hub.subscribe(conn_id, &party.code, name, recipient);
    match previous {
        Some((old_code, old_name)) if old_code == party.code && old_name == name => {}
        Some((old_code, old_name)) => {
            state.membership.connection_closed(&old_code, &old_name);
            state.membership.connection_opened(&party.code, name);
        }
        None => {
            state.membership.connection_opened(&party.code, name);
        }
    }
    tracing::debug!(code = %party.code, name = %name, conn_id = conn_id, "connection subscribed");
    PartyServerMessage::Subscribed { code: party.code.clone() }
}

impl Actor for PartyWs {
    type Context = ws::WebsocketContext<Self>;

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some((code, name)) = self.state.hub.unsubscribe(self.conn_id) {
            self.state.membership.connection_closed(&code, &name);
            tracing::debug!(code = %code, name = %name, conn_id = self.conn_id, "connection closed");
        }
    }
}

impl Handler<PartyOutbound> for PartyWs {
    type Result = ();

    fn handle(&mut self, msg: PartyOutbound, ctx: &mut Self::Context) -> Self::Result {
        ctx.text(msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for PartyWs {
    fn handle(&mut self, item: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let msg = match item {
            Ok(msg) => msg,
            Err(_) => {
                ctx.stop();
                return;
            }
        };
        match msg {
            ws::Message::Text(text) => {
                if let Ok(payload) = serde_json::from_str::<PartyClientMessage>(&text) {
                    match payload {
                        PartyClientMessage::Subscribe { code, name } => {
                            self.handle_subscribe(code, name, ctx);
                        }
                    }
                }
            }
            ws::Message::Ping(bytes) => ctx.pong(&bytes),
            ws::Message::Pong(_) => {}
            ws::Message::Close(_) => ctx.stop(),
            ws::Message::Binary(_) => {}
            ws::Message::Continuation(_) => ctx.stop(),
            ws::Message::Nop => {}
        }
    }
}

#[get("/ws")]
pub async fn party_ws(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(PartyWs::new(state), &req, stream)
}
