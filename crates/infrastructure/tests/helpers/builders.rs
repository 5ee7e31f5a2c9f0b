#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, CNAME, NS};
use hickory_proto::rr::{Name, RData, Record};
use std::net::Ipv4Addr;
use std::str::FromStr;

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

pub fn a_record(owner: &str, ttl: u32, ip: [u8; 4]) -> Record {
    Record::from_rdata(name(owner), ttl, RData::A(A(Ipv4Addr::from(ip))))
}

pub fn cname_record(owner: &str, target: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::CNAME(CNAME(name(target))))
}

pub fn ns_record(zone: &str, nameserver: &str) -> Record {
    Record::from_rdata(name(zone), 172800, RData::NS(NS(name(nameserver))))
}

/// First question name of a request, lowercased with trailing dot.
pub fn query_name(request: &Message) -> String {
    request
        .queries()
        .first()
        .map(|q| q.name().to_string().to_ascii_lowercase())
        .unwrap_or_default()
}

pub struct ReplyBuilder {
    message: Message,
}

impl ReplyBuilder {
    pub fn to(request: &Message) -> Self {
        let mut message = Message::new(request.id(), MessageType::Response, OpCode::Query);
        message.set_recursion_desired(request.recursion_desired());
        for query in request.queries() {
            message.add_query(query.clone());
        }
        Self { message }
    }

    pub fn answer(mut self, record: Record) -> Self {
        self.message.add_answer(record);
        self
    }

    pub fn authority(mut self, record: Record) -> Self {
        self.message.add_name_server(record);
        self
    }

    pub fn additional(mut self, record: Record) -> Self {
        self.message.add_additional(record);
        self
    }

    pub fn rcode(mut self, rcode: ResponseCode) -> Self {
        self.message.set_response_code(rcode);
        self
    }

    pub fn authoritative(mut self) -> Self {
        self.message.set_authoritative(true);
        self
    }

    pub fn recursion_available(mut self) -> Self {
        self.message.set_recursion_available(true);
        self
    }

    pub fn truncated(mut self) -> Self {
        self.message.set_truncated(true);
        self
    }

    pub fn id(mut self, id: u16) -> Self {
        let mut header = *self.message.header();
        header.set_id(id);
        self.message.set_header(header);
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}

/// Delegation of `zone` to `nameserver`, with an A glue record when given.
pub fn referral(request: &Message, zone: &str, nameserver: &str, glue: Option<[u8; 4]>) -> Message {
    let mut reply = ReplyBuilder::to(request).authority(ns_record(zone, nameserver));
    if let Some(ip) = glue {
        reply = reply.additional(a_record(nameserver, 172800, ip));
    }
    reply.build()
}
