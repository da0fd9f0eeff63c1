//! Running balances threaded through the projection loop

use super::engine::NetWorthModel;
use crate::profile::Profile;

/// Balances carried from one projection year to the next
///
/// Each `ProjectionYear` captures a copy of these values; nothing outside the
/// loop holds a reference to the running state.
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Bank balance (emergency liquidity buffer); may go negative
    pub bank_balance: f64,

    /// Total net worth (simple model) or sum of components (extended model)
    pub net_worth: f64,

    /// CPF balance (extended model)
    pub cpf_balance: f64,

    /// Investment portfolio value (extended model)
    pub investment_portfolio: f64,
}

impl ProjectionState {
    /// Initialize state from a profile at projection start
    pub fn from_profile(profile: &Profile, model: NetWorthModel) -> Self {
        let investment_portfolio = match model {
            NetWorthModel::Simple => 0.0,
            NetWorthModel::Extended => {
                (profile.net_worth - profile.bank_balance - profile.cpf_balance).max(0.0)
            }
        };

        Self {
            bank_balance: profile.bank_balance,
            net_worth: profile.net_worth,
            cpf_balance: profile.cpf_balance,
            investment_portfolio,
        }
    }

    /// Cover a negative cashflow from the bank balance
    /// Returns how much of the deficit existing savings actually covered
    pub fn withdraw_deficit(&mut self, net_cashflow: f64) -> f64 {
        if net_cashflow >= 0.0 {
            return 0.0;
        }
        let covered = (-net_cashflow).min(self.bank_balance.max(0.0));
        self.bank_balance += net_cashflow;
        covered
    }

    pub fn grow_bank_balance(&mut self, bank_growth_rate: f64) {
        self.bank_balance *= 1.0 + bank_growth_rate;
    }

    /// Contributions plus growth on the existing balance; the contribution
    /// itself starts earning next year
    pub fn roll_net_worth(&mut self, contribution: f64, return_rate: f64) {
        self.net_worth += contribution + self.net_worth * return_rate;
    }

    pub fn roll_components(&mut self, cpf_contribution: f64, cpf_return: f64, contribution: f64, return_rate: f64) {
        self.cpf_balance = self.cpf_balance * (1.0 + cpf_return) + cpf_contribution;
        self.investment_portfolio = self.investment_portfolio * (1.0 + return_rate) + contribution;
    }

    /// Extended model: net worth is always the sum of its parts
    pub fn sum_components(&mut self) {
        self.net_worth = self.cpf_balance + self.bank_balance + self.investment_portfolio;
    }
}
