use anchor_lang::prelude::Pubkey;
use log::{debug, warn};

use crate::client::AdrenaClient;
use crate::state::{Cortex, CustodySlot, Keyed, Pool, Staking};

/// Handle for one in-flight fetch, tagged with the slot generation it started in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Latest snapshot of a remote value
///
/// Every fetch takes a ticket from `begin`, which bumps the generation.
/// Only the completion carrying the current generation is stored, so a slow
/// fetch that resolves after a newer one started can never overwrite newer
/// data. Failed fetches leave the slot empty and are not retried.
#[derive(Clone, Debug)]
pub struct FetchSlot<T> {
    name: &'static str,
    generation: u64,
    value: Option<T>,
}

impl<T> FetchSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: 0,
            value: None,
        }
    }

    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Stores the fetch result if `ticket` is still current
    ///
    /// Returns `true` when the completion was accepted. A failed current fetch
    /// clears the value.
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        ticket: FetchTicket,
        result: std::result::Result<T, E>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Dropping stale {} fetch (generation {}, current {})",
                self.name, ticket.generation, self.generation
            );
            return false;
        }

        match result {
            Ok(value) => self.value = Some(value),
            Err(err) => {
                warn!("Fetching {} failed: {}", self.name, err);
                self.value = None;
            }
        }
        true
    }

    /// Clears the value and invalidates any in-flight ticket
    pub fn reset(&mut self) {
        self.generation += 1;
        self.value = None;
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }
}

/// Account snapshots backing the instruction forms of one proposal
///
/// Mirrors the dependency tracking of the forms: changing the selected
/// program resets everything, changing the selected pool resets custodies.
pub struct AdrenaMirror {
    program_id: Option<Pubkey>,
    custodies_pool: Option<Pubkey>,
    pub cortex: FetchSlot<Cortex>,
    pub pools: FetchSlot<Vec<Keyed<Pool>>>,
    pub custodies: FetchSlot<Vec<CustodySlot>>,
    pub stakings: FetchSlot<Vec<Keyed<Staking>>>,
}

impl Default for AdrenaMirror {
    fn default() -> Self {
        Self {
            program_id: None,
            custodies_pool: None,
            cortex: FetchSlot::new("cortex"),
            pools: FetchSlot::new("pools"),
            custodies: FetchSlot::new("custodies"),
            stakings: FetchSlot::new("stakings"),
        }
    }
}

impl AdrenaMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescopes the mirror to `program_id`, dropping all snapshots on change
    pub fn select_program(&mut self, program_id: Option<Pubkey>) {
        if self.program_id == program_id {
            return;
        }
        debug!("Mirror program changed to {:?}", program_id);
        self.program_id = program_id;
        self.custodies_pool = None;
        self.cortex.reset();
        self.pools.reset();
        self.custodies.reset();
        self.stakings.reset();
    }

    /// Rescopes custodies to `pool`, dropping the custody snapshot on change
    pub fn select_pool(&mut self, pool: Option<Pubkey>) {
        if self.custodies_pool == pool {
            return;
        }
        self.custodies_pool = pool;
        self.custodies.reset();
    }

    pub fn program_id(&self) -> Option<Pubkey> {
        self.program_id
    }

    pub fn refresh_cortex(&mut self, client: &AdrenaClient) -> bool {
        let ticket = self.cortex.begin();
        self.cortex.complete(ticket, client.get_cortex())
    }

    pub fn refresh_pools(&mut self, client: &AdrenaClient) -> bool {
        let ticket = self.pools.begin();
        self.pools.complete(ticket, client.get_pools())
    }

    pub fn refresh_custodies(&mut self, client: &AdrenaClient, pool: &Keyed<Pool>) -> bool {
        self.select_pool(Some(pool.pubkey));
        let ticket = self.custodies.begin();
        self.custodies.complete(ticket, client.get_custodies(pool))
    }

    pub fn refresh_stakings(&mut self, client: &AdrenaClient) -> bool {
        let ticket = self.stakings.begin();
        self.stakings.complete(ticket, client.get_stakings())
    }

    /// Refreshes every snapshot for `client`, and custodies of `pool` if given
    pub fn sync(&mut self, client: &AdrenaClient, pool: Option<&Keyed<Pool>>) {
        self.select_program(Some(client.program_id()));
        self.refresh_cortex(client);
        self.refresh_pools(client);
        self.refresh_stakings(client);

        match pool {
            Some(pool) => {
                self.refresh_custodies(client, pool);
            }
            None => self.select_pool(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut slot: FetchSlot<u32> = FetchSlot::new("test");

        let older = slot.begin();
        let newer = slot.begin();

        assert!(slot.complete::<String>(newer, Ok(2)));
        assert!(!slot.complete::<String>(older, Ok(1)));
        assert_eq!(slot.get(), Some(&2));
    }

    #[test]
    fn test_failed_fetch_leaves_no_data() {
        let mut slot: FetchSlot<u32> = FetchSlot::new("test");

        let ticket = slot.begin();
        assert!(slot.complete(ticket, Ok::<_, String>(5)));

        let ticket = slot.begin();
        assert!(slot.complete(ticket, Err::<u32, _>("rpc down".to_string())));
        assert!(!slot.is_loaded());
    }

    #[test]
    fn test_reset_invalidates_in_flight_ticket() {
        let mut slot: FetchSlot<u32> = FetchSlot::new("test");

        let ticket = slot.begin();
        slot.reset();

        assert!(!slot.complete::<String>(ticket, Ok(7)));
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_pool_change_resets_custodies_only() {
        let mut mirror = AdrenaMirror::new();
        mirror.select_program(Some(Pubkey::new_unique()));

        let ticket = mirror.pools.begin();
        assert!(mirror.pools.complete::<String>(ticket, Ok(vec![])));
        let ticket = mirror.custodies.begin();
        assert!(mirror.custodies.complete::<String>(ticket, Ok(vec![])));

        mirror.select_pool(Some(Pubkey::new_unique()));

        assert!(mirror.pools.is_loaded());
        assert!(!mirror.custodies.is_loaded());
    }
}
