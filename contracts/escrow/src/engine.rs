//! Investor Registry & Accrual Engine
//!
//! Owns the investor registry and the token ledger handle. Every public
//! operation is one atomic transition: preconditions are checked, state
//! effects are applied, then the ledger is called. If the ledger call
//! fails the previous record and totals are restored before the error is
//! returned, so callers never observe partial state.

use tracing::{debug, info, warn};

use escrow_common::{
    commitment::registry_root,
    errors::{EscrowError, EscrowResult},
    events::{EscrowEvent, EventLog},
    math::{accrual_window, calculate_accrued, reward_headroom, AccrualWindow},
    token_ledger::TokenLedger,
    types::{
        AccrualReceipt, ActionOutcome, Address, CallContext, EscrowAction, InvestorRecord,
        InvestorStatus, ShortAddress,
    },
    validation::{
        require_active_investment, require_external_caller, require_not_invested,
        require_payout_covered, require_positive_amount, require_reward_headroom,
        require_solvent,
    },
    BTreeMap, Vec,
};

use crate::codec::decode_call;
use crate::EscrowConfig;

/// The escrow engine
#[derive(Debug)]
pub struct Escrow<L: TokenLedger> {
    config: EscrowConfig,
    ledger: L,
    investors: BTreeMap<Address, InvestorRecord>,
    /// Sum of every investor's `current_balance`
    total_principal: u128,
    events: EventLog,
}

impl<L: TokenLedger> Escrow<L> {
    /// Create an engine bound to `ledger`
    pub fn new(config: EscrowConfig, ledger: L) -> EscrowResult<Self> {
        config.validate()?;

        info!(
            token = %ShortAddress(&config.token),
            pool = %ShortAddress(&config.escrow_address),
            reward_rate_bps = config.reward_rate_bps,
            basis = ?config.accrual_basis,
            "escrow engine initialized"
        );

        Ok(Self {
            config,
            ledger,
            investors: BTreeMap::new(),
            total_principal: 0,
            events: EventLog::new(),
        })
    }

    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Host access to the ledger, e.g. to seed the pool or approve spends
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn into_ledger(self) -> L {
        self.ledger
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Commit `amount` of principal, pulled from the caller with transfer-from
    pub fn invest(&mut self, ctx: &CallContext, amount: u128) -> EscrowResult<u128> {
        self.apply_invest(ctx, amount)
            .map_err(|err| rejected("invest", &ctx.caller, err))
    }

    /// Pay the accrued reward to the caller; principal is unchanged
    pub fn claim_balance(&mut self, ctx: &CallContext) -> EscrowResult<AccrualReceipt> {
        self.apply_claim(ctx)
            .map_err(|err| rejected("claim_balance", &ctx.caller, err))
    }

    /// Fold the accrued reward into the caller's principal
    pub fn compound_balance(&mut self, ctx: &CallContext) -> EscrowResult<AccrualReceipt> {
        self.apply_compound(ctx)
            .map_err(|err| rejected("compound_balance", &ctx.caller, err))
    }

    /// Pay out principal plus one final reward and close the record
    pub fn withdraw(&mut self, ctx: &CallContext) -> EscrowResult<u128> {
        self.apply_withdraw(ctx)
            .map_err(|err| rejected("withdraw", &ctx.caller, err))
    }

    /// Run any action
    pub fn execute(&mut self, ctx: &CallContext, action: &EscrowAction) -> EscrowResult<ActionOutcome> {
        let investor_address = ctx.caller;

        match *action {
            EscrowAction::Invest { amount } => {
                let amount = self.invest(ctx, amount)?;
                Ok(ActionOutcome::Invested {
                    investor_address,
                    amount,
                })
            }
            EscrowAction::ClaimBalance => self.claim_balance(ctx).map(ActionOutcome::Claimed),
            EscrowAction::CompoundBalance => {
                self.compound_balance(ctx).map(ActionOutcome::Compounded)
            }
            EscrowAction::Withdraw => {
                let total_withdrawn = self.withdraw(ctx)?;
                Ok(ActionOutcome::Withdrawn {
                    investor_address,
                    total_withdrawn,
                })
            }
        }
    }

    /// Decode raw call data and run it
    pub fn dispatch(&mut self, call_data: &[u8]) -> EscrowResult<ActionOutcome> {
        let call = decode_call(call_data)?;
        debug!(op = call.action.op_code(), caller = %ShortAddress(&call.caller), "dispatching call");
        self.execute(&call.context(), &call.action)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn apply_invest(&mut self, ctx: &CallContext, amount: u128) -> EscrowResult<u128> {
        let investor = ctx.caller;

        require_positive_amount(amount)?;
        require_external_caller(&investor, &self.config.escrow_address)?;
        let previous = self.investors.get(&investor).cloned();
        require_not_invested(previous.as_ref(), investor)?;

        let prior_total = self.total_principal;
        let total_principal = prior_total
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;

        // Effects
        self.investors
            .insert(investor, InvestorRecord::new(amount, ctx.block_height));
        self.total_principal = total_principal;

        // Interaction
        let pool = self.config.escrow_address;
        if let Err(reason) = self.ledger.transfer_from(&pool, &investor, &pool, amount) {
            self.restore(investor, previous, prior_total);
            return Err(reason.into());
        }

        self.events.emit(EscrowEvent::InvestorInvested {
            investor_address: investor,
            amount,
            block_height: ctx.block_height,
        });

        info!(
            investor = %ShortAddress(&investor),
            amount = %amount,
            block = ctx.block_height,
            "investment committed"
        );

        Ok(amount)
    }

    fn apply_claim(&mut self, ctx: &CallContext) -> EscrowResult<AccrualReceipt> {
        let investor = ctx.caller;

        let previous = require_active_investment(self.investors.get(&investor), investor)?.clone();
        let (accrued, window) = self.accrue(&previous, ctx.block_height)?;
        require_reward_headroom(self.pool_balance(), self.total_principal, accrued)?;

        // Effects
        let mut record = previous.clone();
        record.advance_checkpoint(window.next_checkpoint);
        let current_balance = record.current_balance;
        self.investors.insert(investor, record);

        // Interaction
        let pool = self.config.escrow_address;
        if let Err(reason) = self.ledger.transfer(&pool, &investor, accrued) {
            let total = self.total_principal;
            self.restore(investor, Some(previous), total);
            return Err(reason.into());
        }

        self.events.emit(EscrowEvent::InvestorClaimed {
            investor_address: investor,
            current_balance,
            claimable_balance: accrued,
            block_height: ctx.block_height,
        });

        info!(
            investor = %ShortAddress(&investor),
            current_balance = %current_balance,
            claimed = %accrued,
            periods = window.periods,
            "reward claimed"
        );

        Ok(AccrualReceipt {
            investor_address: investor,
            current_balance,
            claimable_balance: accrued,
        })
    }

    fn apply_compound(&mut self, ctx: &CallContext) -> EscrowResult<AccrualReceipt> {
        let investor = ctx.caller;

        let previous = require_active_investment(self.investors.get(&investor), investor)?.clone();
        let (accrued, window) = self.accrue(&previous, ctx.block_height)?;
        require_reward_headroom(self.pool_balance(), self.total_principal, accrued)?;

        let current_balance = previous
            .current_balance
            .checked_add(accrued)
            .ok_or(EscrowError::Overflow)?;
        let total_principal = self
            .total_principal
            .checked_add(accrued)
            .ok_or(EscrowError::Overflow)?;

        // Effects only: the reward never leaves the pool
        let mut record = previous;
        record.current_balance = current_balance;
        record.advance_checkpoint(window.next_checkpoint);
        self.investors.insert(investor, record);
        self.total_principal = total_principal;

        self.events.emit(EscrowEvent::InvestorCompounded {
            investor_address: investor,
            current_balance,
            claimable_balance: accrued,
            block_height: ctx.block_height,
        });

        info!(
            investor = %ShortAddress(&investor),
            current_balance = %current_balance,
            compounded = %accrued,
            periods = window.periods,
            "reward compounded"
        );

        Ok(AccrualReceipt {
            investor_address: investor,
            current_balance,
            claimable_balance: accrued,
        })
    }

    fn apply_withdraw(&mut self, ctx: &CallContext) -> EscrowResult<u128> {
        let investor = ctx.caller;

        let previous = require_active_investment(self.investors.get(&investor), investor)?.clone();
        let (accrued, window) = self.accrue(&previous, ctx.block_height)?;

        let total = previous
            .current_balance
            .checked_add(accrued)
            .ok_or(EscrowError::Overflow)?;
        require_payout_covered(
            self.pool_balance(),
            self.total_principal,
            previous.current_balance,
            total,
        )?;
        let prior_total = self.total_principal;
        let total_principal = prior_total
            .checked_sub(previous.current_balance)
            .ok_or(EscrowError::Overflow)?;

        // Effects
        let mut record = previous.clone();
        record.current_balance = 0;
        record.advance_checkpoint(window.next_checkpoint);
        self.investors.insert(investor, record);
        self.total_principal = total_principal;

        // Interaction
        let pool = self.config.escrow_address;
        if let Err(reason) = self.ledger.transfer(&pool, &investor, total) {
            self.restore(investor, Some(previous), prior_total);
            return Err(reason.into());
        }

        self.events.emit(EscrowEvent::InvestorWithdrawn {
            investor_address: investor,
            total_withdrawn: total,
            block_height: ctx.block_height,
        });

        info!(
            investor = %ShortAddress(&investor),
            total_withdrawn = %total,
            final_reward = %accrued,
            "investment withdrawn"
        );

        Ok(total)
    }

    /// Reward due on `record` at `block_height` and the checkpoint it moves to
    fn accrue(&self, record: &InvestorRecord, block_height: u64) -> EscrowResult<(u128, AccrualWindow)> {
        let window = accrual_window(self.config.accrual_basis, record.last_accrual_block, block_height)?;
        let accrued = calculate_accrued(record.current_balance, self.config.reward_rate_bps, window.periods)?;
        Ok((accrued, window))
    }

    /// Undo the effects of a transition whose ledger call failed
    fn restore(&mut self, investor: Address, previous: Option<InvestorRecord>, total_principal: u128) {
        warn!(investor = %ShortAddress(&investor), "ledger call failed, rolling back");

        match previous {
            Some(record) => {
                self.investors.insert(investor, record);
            }
            None => {
                self.investors.remove(&investor);
            }
        }
        self.total_principal = total_principal;
    }

    // ========================================================================
    // Views
    // ========================================================================

    pub fn investor(&self, investor: &Address) -> Option<&InvestorRecord> {
        self.investors.get(investor)
    }

    pub fn status(&self, investor: &Address) -> InvestorStatus {
        self.investors
            .get(investor)
            .map(InvestorRecord::status)
            .unwrap_or_default()
    }

    pub fn has_invested(&self, investor: &Address) -> bool {
        self.investors
            .get(investor)
            .map(|r| r.has_invested)
            .unwrap_or(false)
    }

    pub fn current_balance(&self, investor: &Address) -> u128 {
        self.investors
            .get(investor)
            .map(|r| r.current_balance)
            .unwrap_or(0)
    }

    /// Reward the next reward-triggering call would compute, without
    /// changing state
    pub fn pending_reward(&self, investor: &Address, block_height: u64) -> EscrowResult<u128> {
        let record = require_active_investment(self.investors.get(investor), *investor)?;
        self.accrue(record, block_height).map(|(accrued, _)| accrued)
    }

    /// Engine's balance on the token ledger
    pub fn pool_balance(&self) -> u128 {
        self.ledger.balance_of(&self.config.escrow_address)
    }

    pub fn total_principal(&self) -> u128 {
        self.total_principal
    }

    /// Idle pool balance rewards can be paid from
    pub fn reward_headroom(&self) -> u128 {
        reward_headroom(self.pool_balance(), self.total_principal)
    }

    /// Number of identities that ever invested
    pub fn investor_count(&self) -> usize {
        self.investors.len()
    }

    /// Number of identities with a live investment
    pub fn active_investor_count(&self) -> usize {
        self.investors.values().filter(|r| r.is_active()).count()
    }

    /// Pool holds at least the principal owed to investors
    pub fn check_solvency(&self) -> EscrowResult<()> {
        require_solvent(self.pool_balance(), self.total_principal)
    }

    /// SHA-256 commitment over the registry
    pub fn state_root(&self) -> [u8; 32] {
        registry_root(&self.investors, self.total_principal)
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Drain emitted events
    pub fn take_events(&mut self) -> Vec<EscrowEvent> {
        self.events.take()
    }
}

fn rejected(op: &'static str, investor: &Address, err: EscrowError) -> EscrowError {
    warn!(op, investor = %ShortAddress(investor), code = err.code(), "{}", err);
    err
}

// ============================================================================
// Tests
// ============================================================================
