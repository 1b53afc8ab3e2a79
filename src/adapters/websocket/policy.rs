//! Broadcast policy - who receives a command's success event.
//!
//! Delivery and courier mutations are shared operational truth: every
//! connected dashboard must reflect them immediately, so their refreshed
//! collections go to all connections. Reads and customer edits are
//! requester-scoped. The table lives here, away from the transport, so the
//! audience rule can be audited and tested in isolation.

use super::commands::CommandKind;

/// The set of connections a success event is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Only the connection that issued the command.
    Requester,
    /// Every connected handle, requester included.
    AllConnections,
    /// Every connected handle except the requester.
    OtherConnections,
}

/// The audience for a command's primary success event.
pub const fn audience_for(kind: CommandKind) -> Audience {
    match kind {
        CommandKind::AddDelivery | CommandKind::UpdateDelivery | CommandKind::LocateCourier => {
            Audience::AllConnections
        }
        CommandKind::Broadcast => Audience::OtherConnections,
        CommandKind::TodayDeliveries
        | CommandKind::FetchCustomers
        | CommandKind::FetchCouriers
        | CommandKind::UpsertCustomer
        | CommandKind::AuthenticateCourier
        | CommandKind::DeliveryReport
        | CommandKind::RelayLogin
        | CommandKind::RelayStatusCheck
        | CommandKind::RelayForcePairing
        | CommandKind::SendMessage
        | CommandKind::Echo => Audience::Requester,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_state_mutations_reach_every_connection() {
        assert_eq!(
            audience_for(CommandKind::AddDelivery),
            Audience::AllConnections
        );
        assert_eq!(
            audience_for(CommandKind::UpdateDelivery),
            Audience::AllConnections
        );
        assert_eq!(
            audience_for(CommandKind::LocateCourier),
            Audience::AllConnections
        );
    }

    #[test]
    fn reads_and_customer_edits_stay_requester_scoped() {
        for kind in [
            CommandKind::TodayDeliveries,
            CommandKind::FetchCustomers,
            CommandKind::FetchCouriers,
            CommandKind::UpsertCustomer,
            CommandKind::AuthenticateCourier,
            CommandKind::DeliveryReport,
        ] {
            assert_eq!(audience_for(kind), Audience::Requester, "{kind:?}");
        }
    }

    #[test]
    fn relay_and_generic_commands_stay_requester_scoped_except_broadcast() {
        assert_eq!(
            audience_for(CommandKind::Broadcast),
            Audience::OtherConnections
        );
        for kind in [
            CommandKind::RelayLogin,
            CommandKind::RelayStatusCheck,
            CommandKind::RelayForcePairing,
            CommandKind::SendMessage,
            CommandKind::Echo,
        ] {
            assert_eq!(audience_for(kind), Audience::Requester, "{kind:?}");
        }
    }

    #[test]
    fn the_table_is_total() {
        for kind in CommandKind::ALL {
            // A missing arm would fail to compile; this guards the ALL list.
            let _ = audience_for(kind);
        }
    }
}
