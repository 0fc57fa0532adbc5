use crate::model::user::LeaveBalance;

/// Draws `requested_days` from paid leave first and books any shortfall as
/// unpaid leave. `requested_days` must already be validated as positive.
///
/// Returns `None` when the unpaid balance cannot hold the shortfall.
pub fn deduct(balance: LeaveBalance, requested_days: u32) -> Option<LeaveBalance> {
    if balance.paid_leave >= requested_days {
        return Some(LeaveBalance {
            paid_leave: balance.paid_leave - requested_days,
            unpaid_leave: balance.unpaid_leave,
        });
    }
    let shortfall = requested_days - balance.paid_leave;
    Some(LeaveBalance {
        paid_leave: 0,
        unpaid_leave: balance.unpaid_leave.checked_add(shortfall)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(paid_leave: u32, unpaid_leave: u32) -> LeaveBalance {
        LeaveBalance {
            paid_leave,
            unpaid_leave,
        }
    }

    #[test]
    fn covered_request_only_touches_paid_leave() {
        assert_eq!(deduct(balance(30, 0), 10), Some(balance(20, 0)));
        assert_eq!(deduct(balance(5, 2), 5), Some(balance(0, 2)));
    }

    #[test]
    fn shortfall_spills_into_unpaid_leave() {
        assert_eq!(deduct(balance(20, 0), 25), Some(balance(0, 5)));
        assert_eq!(deduct(balance(0, 5), 3), Some(balance(0, 8)));
    }

    #[test]
    fn unpaid_overflow_is_refused() {
        assert_eq!(deduct(balance(2, u32::MAX - 1), 3), None);
        assert_eq!(deduct(balance(2, u32::MAX - 1), 2), Some(balance(0, u32::MAX - 1)));
        assert_eq!(deduct(balance(0, u32::MAX - 1), 1), Some(balance(0, u32::MAX)));
    }

    #[test]
    fn every_deduction_conserves_days() {
        for paid in 0..=12u32 {
            for unpaid in [0u32, 1, 7] {
                for days in 1..=15u32 {
                    let after = deduct(balance(paid, unpaid), days).unwrap();
                    assert_eq!(
                        (paid - after.paid_leave) + (after.unpaid_leave - unpaid),
                        days,
                        "paid={paid} unpaid={unpaid} days={days}"
                    );
                    assert!(after.unpaid_leave >= unpaid);
                }
            }
        }
    }
}
