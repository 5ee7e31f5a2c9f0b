use super::nameserver_cache::NameserverCache;
use crate::dns::exchange::DnsExchange;
use crate::dns::forwarding::MessageBuilder;
use async_trait::async_trait;
use dns_relay_application::ports::IterativeResolver;
use dns_relay_domain::{DnsQuestion, DomainError};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const DEFAULT_MAX_HOPS: usize = 32;
const DEFAULT_MAX_CNAME_CHAIN: usize = 8;
const DNS_PORT: u16 = 53;

/// Counts nameserver exchanges for one walk, nested lookups included.
#[derive(Debug)]
struct HopBudget {
    limit: usize,
    spent: usize,
}

impl HopBudget {
    fn new(limit: usize) -> Self {
        Self { limit, spent: 0 }
    }

    fn spend(&mut self) -> Result<(), DomainError> {
        if self.spent >= self.limit {
            return Err(DomainError::HopBudgetExhausted(self.limit));
        }
        self.spent += 1;
        Ok(())
    }
}

struct Referral {
    zone: Name,
    nameservers: Vec<Name>,
    glue: Vec<IpAddr>,
    /// Smallest TTL among the delegating NS records.
    ttl: Duration,
}

enum Step {
    Answer(Vec<Record>),
    Referral(Referral),
    /// NXDOMAIN or NODATA.
    Empty,
}

/// Resolves names by following referrals down from the root hints.
///
/// Every question goes out as class IN, whatever class the caller asked
/// for.
pub struct HierarchyWalker {
    exchange: Arc<dyn DnsExchange>,
    cache: Arc<NameserverCache>,
    root_servers: Arc<Vec<IpAddr>>,
    max_hops: usize,
    max_cname_chain: usize,
    port: u16,
}

impl HierarchyWalker {
    pub fn new(
        exchange: Arc<dyn DnsExchange>,
        root_servers: Vec<IpAddr>,
        cache: Arc<NameserverCache>,
    ) -> Self {
        Self {
            exchange,
            cache,
            root_servers: Arc::new(root_servers),
            max_hops: DEFAULT_MAX_HOPS,
            max_cname_chain: DEFAULT_MAX_CNAME_CHAIN,
            port: DNS_PORT,
        }
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn with_max_cname_chain(mut self, max_cname_chain: usize) -> Self {
        self.max_cname_chain = max_cname_chain;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn cache(&self) -> &Arc<NameserverCache> {
        &self.cache
    }

    fn root_hints(&self) -> (Name, Arc<Vec<IpAddr>>) {
        (Name::root(), Arc::clone(&self.root_servers))
    }

    async fn resolve(
        &self,
        name: &Name,
        record_type: RecordType,
        budget: &mut HopBudget,
    ) -> Result<Vec<Record>, DomainError> {
        let mut output = Vec::new();
        let mut target = name.clone();

        for _ in 0..=self.max_cname_chain {
            let answers = self
                .lookup(&target, record_type, budget)
                .await?;

            let satisfied = matches!(record_type, RecordType::CNAME | RecordType::ANY)
                || answers.iter().any(|r| r.record_type() == record_type);
            let next = if satisfied {
                None
            } else {
                chase_cname(&answers, &target)
            };

            output.extend(answers);
            match next {
                Some(alias) => {
                    debug!(from = %target, to = %alias, "Following CNAME");
                    target = alias;
                }
                None => return Ok(output),
            }
        }

        debug!(
            domain = %name,
            limit = self.max_cname_chain,
            "CNAME chain limit reached"
        );
        Ok(output)
    }

    fn lookup<'a>(
        &'a self,
        target: &'a Name,
        record_type: RecordType,
        budget: &'a mut HopBudget,
    ) -> BoxFuture<'a, Result<Vec<Record>, DomainError>> {
        Box::pin(async move {
            let cached = self.cache.closest(target);
            let mut from_cache = cached.is_some();
            let (mut zone, mut servers) = cached.unwrap_or_else(|| self.root_hints());

            loop {
                let step = match self.ask(&servers, &zone, target, record_type, budget).await {
                    Ok(step) => step,
                    // A cached delegation gone bad gets one restart from the root.
                    Err(DomainError::NoReachableNameserver(_)) if from_cache => {
                        debug!(
                            domain = %target,
                            zone = %zone,
                            "Cached delegation unusable, restarting from root"
                        );
                        self.cache.remove(&zone);
                        from_cache = false;
                        (zone, servers) = self.root_hints();
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                from_cache = false;

                match step {
                    Step::Answer(records) => return Ok(records),
                    Step::Empty => return Ok(Vec::new()),
                    Step::Referral(referral) => {
                        let addresses = self.referral_addresses(&referral, budget).await?;
                        debug!(
                            domain = %target,
                            zone = %referral.zone,
                            nameservers = addresses.len(),
                            "Following referral"
                        );
                        self.cache
                            .insert(&referral.zone, addresses.clone(), referral.ttl);
                        zone = referral.zone;
                        servers = Arc::new(addresses);
                    }
                }
            }
        })
    }

    async fn ask(
        &self,
        servers: &[IpAddr],
        zone: &Name,
        target: &Name,
        record_type: RecordType,
        budget: &mut HopBudget,
    ) -> Result<Step, DomainError> {
        let mut order = servers.to_vec();
        fastrand::shuffle(&mut order);

        for ip in order {
            budget.spend()?;

            let server = SocketAddr::new(ip, self.port);
            let request =
                MessageBuilder::query_for(target.clone(), record_type, DNSClass::IN, false);

            let reply = match self.exchange.exchange(server, &request).await {
                Ok(reply) => reply,
                Err(e) => {
                    debug!(server = %server, error = %e, "Nameserver exchange failed");
                    continue;
                }
            };

            match classify(&reply, target, zone) {
                Some(step) => return Ok(step),
                None => debug!(server = %server, zone = %zone, "Lame response"),
            }
        }

        Err(DomainError::NoReachableNameserver(zone.to_string()))
    }

    async fn referral_addresses(
        &self,
        referral: &Referral,
        budget: &mut HopBudget,
    ) -> Result<Vec<IpAddr>, DomainError> {
        if !referral.glue.is_empty() {
            return Ok(referral.glue.clone());
        }

        let mut names = referral.nameservers.clone();
        fastrand::shuffle(&mut names);

        for nameserver in names {
            match self
                .lookup(&nameserver, RecordType::A, budget)
                .await
            {
                Ok(records) => {
                    let addresses = addresses_of(&records, |_| true);
                    if !addresses.is_empty() {
                        return Ok(addresses);
                    }
                }
                Err(e @ DomainError::HopBudgetExhausted(_)) => return Err(e),
                Err(e) => {
                    debug!(nameserver = %nameserver, error = %e, "Glue-less nameserver unresolved")
                }
            }
        }

        Err(DomainError::NoReachableNameserver(referral.zone.to_string()))
    }
}

#[async_trait]
impl IterativeResolver for HierarchyWalker {
    async fn walk(&self, question: &DnsQuestion) -> Vec<String> {
        let name = match MessageBuilder::parse_name(&question.fqdn()) {
            Ok(name) => name,
            Err(e) => {
                debug!(error = %e, "Iterative walk skipped");
                return Vec::new();
            }
        };

        let record_type = RecordType::from(question.record_type);
        let mut budget = HopBudget::new(self.max_hops);

        match self.resolve(&name, record_type, &mut budget).await
        {
            Ok(records) => {
                debug!(
                    domain = %name,
                    records = records.len(),
                    hops = budget.spent,
                    "Iterative walk finished"
                );
                records.iter().map(ToString::to_string).collect()
            }
            Err(e) => {
                debug!(domain = %name, hops = budget.spent, error = %e, "Iterative walk failed");
                Vec::new()
            }
        }
    }
}

/// `None` means the server was lame and the next one should be tried.
fn classify(reply: &Message, target: &Name, zone: &Name) -> Option<Step> {
    match reply.response_code() {
        ResponseCode::NoError => {}
        ResponseCode::NXDomain => return Some(Step::Empty),
        _ => return None,
    }

    if !reply.answers().is_empty() {
        return Some(Step::Answer(reply.answers().to_vec()));
    }

    let has_ns = reply
        .name_servers()
        .iter()
        .any(|r| r.record_type() == RecordType::NS);
    if reply.authoritative() || !has_ns {
        return Some(Step::Empty);
    }

    referral_from(reply, target, zone).map(Step::Referral)
}

fn referral_from(reply: &Message, target: &Name, zone: &Name) -> Option<Referral> {
    let owner = reply
        .name_servers()
        .iter()
        .filter(|r| r.record_type() == RecordType::NS)
        .map(Record::name)
        .filter(|owner| owner.zone_of(target) && zone.zone_of(owner))
        .max_by_key(|owner| owner.num_labels())?
        .clone();

    let delegation: Vec<&Record> = reply
        .name_servers()
        .iter()
        .filter(|r| r.name() == &owner)
        .filter(|r| matches!(r.data(), RData::NS(_)))
        .collect();
    let nameservers: Vec<Name> = delegation
        .iter()
        .filter_map(|r| match r.data() {
            RData::NS(ns) => Some(ns.0.clone()),
            _ => None,
        })
        .collect();
    let ttl = delegation.iter().map(|r| r.ttl()).min().unwrap_or(0);

    let glue_records: Vec<Record> = reply
        .additionals()
        .iter()
        .filter(|r| nameservers.contains(r.name()))
        .cloned()
        .collect();
    let mut glue = addresses_of(&glue_records, IpAddr::is_ipv4);
    if glue.is_empty() {
        glue = addresses_of(&glue_records, IpAddr::is_ipv6);
    }

    Some(Referral {
        zone: owner,
        nameservers,
        glue,
        ttl: Duration::from_secs(u64::from(ttl)),
    })
}

fn addresses_of(records: &[Record], keep: impl Fn(&IpAddr) -> bool) -> Vec<IpAddr> {
    records
        .iter()
        .filter_map(|r| match r.data() {
            RData::A(a) => Some(IpAddr::V4(a.0)),
            RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
            _ => None,
        })
        .filter(|ip| keep(ip))
        .collect()
}

/// End of the CNAME chain that starts at `from` within `answers`.
fn chase_cname(answers: &[Record], from: &Name) -> Option<Name> {
    let mut cursor = from.clone();
    let mut moved = false;

    for _ in 0..answers.len() {
        let next = answers.iter().find_map(|r| match r.data() {
            RData::CNAME(cname) if r.name() == &cursor => Some(cname.0.clone()),
            _ => None,
        });
        match next {
            Some(alias) => {
                cursor = alias;
                moved = true;
            }
            None => break,
        }
    }

    moved.then_some(cursor)
}
