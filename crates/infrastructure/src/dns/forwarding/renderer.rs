//! Presentation-format rendering of DNS replies.
//!
//! Output follows the familiar `dig` layout: header comments, a question
//! section whose entries are `;`-prefixed, then one block per non-empty
//! record section.

use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::Record;
use std::fmt::Write;

pub struct MessageRenderer;

impl MessageRenderer {
    pub fn render(message: &Message) -> String {
        let mut out = String::with_capacity(512);

        let _ = writeln!(
            out,
            ";; ->>HEADER<<- opcode: {}, status: {}, id: {}",
            opcode_name(message.op_code()),
            rcode_name(message.response_code()),
            message.id()
        );
        let _ = writeln!(
            out,
            ";; flags:{}; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
            flags(message),
            message.queries().len(),
            message.answers().len(),
            message.name_servers().len(),
            message.additionals().len()
        );

        if !message.queries().is_empty() {
            out.push_str("\n;; QUESTION SECTION:\n");
            for query in message.queries() {
                let _ = writeln!(
                    out,
                    ";{} {} {}",
                    query.name(),
                    query.query_class(),
                    query.query_type()
                );
            }
        }

        render_section(&mut out, "ANSWER", message.answers());
        render_section(&mut out, "AUTHORITY", message.name_servers());
        render_section(&mut out, "ADDITIONAL", message.additionals());

        out
    }
}

fn render_section(out: &mut String, title: &str, records: &[Record]) {
    if records.is_empty() {
        return;
    }

    let _ = write!(out, "\n;; {} SECTION:\n", title);
    for record in records {
        let _ = writeln!(out, "{}", record);
    }
}

fn flags(message: &Message) -> String {
    let mut flags = String::new();
    let set = [
        (message.message_type() == MessageType::Response, " qr"),
        (message.authoritative(), " aa"),
        (message.truncated(), " tc"),
        (message.recursion_desired(), " rd"),
        (message.recursion_available(), " ra"),
        (message.authentic_data(), " ad"),
        (message.checking_disabled(), " cd"),
    ];
    for (enabled, name) in set {
        if enabled {
            flags.push_str(name);
        }
    }
    flags
}

fn opcode_name(op_code: OpCode) -> String {
    match op_code {
        OpCode::Query => "QUERY".to_string(),
        OpCode::Status => "STATUS".to_string(),
        OpCode::Notify => "NOTIFY".to_string(),
        OpCode::Update => "UPDATE".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

fn rcode_name(rcode: ResponseCode) -> String {
    match rcode {
        ResponseCode::NoError => "NOERROR".to_string(),
        ResponseCode::FormErr => "FORMERR".to_string(),
        ResponseCode::ServFail => "SERVFAIL".to_string(),
        ResponseCode::NXDomain => "NXDOMAIN".to_string(),
        ResponseCode::NotImp => "NOTIMP".to_string(),
        ResponseCode::Refused => "REFUSED".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}
