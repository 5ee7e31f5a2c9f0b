use hickory_proto::rr::Name;
use lru::LruCache;
use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct Delegation {
    addresses: Arc<Vec<IpAddr>>,
    expires_at: Instant,
}

impl Delegation {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Zone → nameserver addresses learned from referrals, each kept for the
/// TTL of the delegating NS records.
///
/// Shared by every in-flight walk; the mutex is held only for the map
/// operation itself, never across an await.
pub struct NameserverCache {
    zones: Mutex<LruCache<String, Delegation>>,
}

impl NameserverCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            zones: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// A zero `ttl` or an empty address list caches nothing.
    pub fn insert(&self, zone: &Name, addresses: Vec<IpAddr>, ttl: Duration) {
        if addresses.is_empty() || ttl.is_zero() {
            return;
        }
        let delegation = Delegation {
            addresses: Arc::new(addresses),
            expires_at: Instant::now() + ttl,
        };
        self.lock().put(zone_key(zone), delegation);
    }

    pub fn get(&self, zone: &Name) -> Option<Arc<Vec<IpAddr>>> {
        let key = zone_key(zone);
        let mut cache = self.lock();
        live_entry(&mut cache, &key, Instant::now())
    }

    pub fn remove(&self, zone: &Name) {
        self.lock().pop(&zone_key(zone));
    }

    /// Deepest live zone enclosing `name`, excluding the root. Expired
    /// entries met on the way up are dropped.
    pub fn closest(&self, name: &Name) -> Option<(Name, Arc<Vec<IpAddr>>)> {
        let now = Instant::now();
        let mut zone = name.clone();
        let mut cache = self.lock();

        while !zone.is_root() {
            if let Some(addresses) = live_entry(&mut cache, &zone_key(&zone), now) {
                return Some((zone, addresses));
            }
            zone = zone.base_name();
        }

        None
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Delegation>> {
        self.zones.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn live_entry(
    cache: &mut LruCache<String, Delegation>,
    key: &str,
    now: Instant,
) -> Option<Arc<Vec<IpAddr>>> {
    let cached = cache
        .get(key)
        .map(|delegation| delegation.is_live(now).then(|| Arc::clone(&delegation.addresses)));

    match cached {
        Some(Some(addresses)) => Some(addresses),
        Some(None) => {
            cache.pop(key);
            None
        }
        None => None,
    }
}

fn zone_key(zone: &Name) -> String {
    let mut key = zone.to_string().to_ascii_lowercase();
    if !key.ends_with('.') {
        key.push('.');
    }
    key
}
