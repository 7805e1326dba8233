use surety_common::{AccountId, FlightStatus, LedgerEvent, SuretyError};
use surety_ledger::{Genesis, InsurancePolicy, Ledger, Resolution};

const TS: u64 = 1_700_000_000;

fn id(s: &str) -> AccountId {
    AccountId::from(s)
}

fn funded(policy: InsurancePolicy) -> Ledger {
    let mut ledger = Ledger::from_genesis(Genesis::new("owner", "A0").with_policy(policy)).unwrap();
    ledger.fund_airline(&id("A0"), 10).unwrap();
    ledger
}

#[test]
fn test_premium_routed_to_airline() {
    let mut ledger = funded(InsurancePolicy::default());
    let key = ledger.register_flight(&id("A0"), "MS653", TS, 5, "RUH", "HBE").unwrap();
    ledger.drain_events();

    ledger.buy_insurance(&id("P"), "MS653", "HBE", TS, 3).unwrap();
    assert_eq!(ledger.balance_of(&id("A0")), 3);
    assert_eq!(ledger.capital(), 10);

    let names: Vec<&str> = ledger.drain_events().iter().map(LedgerEvent::name).collect();
    assert_eq!(names, vec!["InsurancePurchased", "PremiumCredited"]);

    ledger.resolve_flight(&key, FlightStatus::OnTime).unwrap();
    assert_eq!(ledger.balance_of(&id("P")), 0);
    assert_eq!(ledger.withdraw(&id("A0")).unwrap().amount, 3);
    assert_eq!(ledger.total_withdrawn(), 3);
}

#[test]
fn test_premium_retained_as_capital() {
    let policy = InsurancePolicy {
        premium_to_airline: false,
        ..InsurancePolicy::default()
    };
    let mut ledger = funded(policy);
    ledger.register_flight(&id("A0"), "MS653", TS, 5, "RUH", "HBE").unwrap();
    ledger.drain_events();

    ledger.buy_insurance(&id("P"), "MS653", "HBE", TS, 3).unwrap();
    assert_eq!(ledger.balance_of(&id("A0")), 0);
    assert_eq!(ledger.capital(), 13);
    let names: Vec<&str> = ledger.drain_events().iter().map(LedgerEvent::name).collect();
    assert_eq!(names, vec!["InsurancePurchased"]);
}

#[test]
fn test_cap_is_cumulative_and_rejection_changes_nothing() {
    let mut ledger = funded(InsurancePolicy::default());
    let key = ledger.register_flight(&id("A0"), "MS653", TS, 5, "RUH", "HBE").unwrap();

    ledger.buy_insurance(&id("P"), "MS653", "HBE", TS, 4).unwrap();
    ledger.drain_events();
    let err = ledger.buy_insurance(&id("P"), "MS653", "HBE", TS, 2).unwrap_err();
    assert!(matches!(err, SuretyError::ExceedsCap(_)));
    assert_eq!(ledger.get_passenger_paid_amount(&key, &id("P")), 4);
    assert_eq!(ledger.balance_of(&id("A0")), 4);
    assert!(ledger.pending_events().is_empty());

    ledger.buy_insurance(&id("P"), "MS653", "HBE", TS, 1).unwrap();
    assert_eq!(ledger.get_passenger_paid_amount(&key, &id("P")), 5);
    assert_eq!(ledger.flight(&key).unwrap().insurees, vec![id("P")]);
}

#[test]
fn test_first_purchase_above_cap_is_rejected() {
    let mut ledger = funded(InsurancePolicy::default());
    let key = ledger.register_flight(&id("A0"), "MS653", TS, 5, "RUH", "HBE").unwrap();
    ledger.drain_events();

    let err = ledger.buy_insurance(&id("P"), "MS653", "HBE", TS, 6).unwrap_err();
    assert!(matches!(err, SuretyError::ExceedsCap(_)));
    assert_eq!(ledger.get_passenger_paid_amount(&key, &id("P")), 0);
    assert!(ledger.flight(&key).unwrap().insurees.is_empty());
    assert_eq!(ledger.balance_of(&id("A0")), 0);
    assert_eq!(ledger.capital(), 10);
    assert!(ledger.pending_events().is_empty());
}

#[test]
fn test_late_resolution_credits_every_insuree_once() {
    let mut ledger = funded(InsurancePolicy::default());
    let key = ledger.register_flight(&id("A0"), "MS653", TS, 10, "RUH", "HBE").unwrap();
    ledger.buy_insurance(&id("P1"), "MS653", "HBE", TS, 10).unwrap();
    ledger.buy_insurance(&id("P2"), "MS653", "HBE", TS, 3).unwrap();

    let res = ledger.resolve_flight(&key, FlightStatus::LateTechnical).unwrap();
    assert_eq!(
        res,
        Resolution::Resolved {
            status: FlightStatus::LateTechnical,
            credited: vec![(id("P1"), 15), (id("P2"), 4)],
        }
    );

    let res = ledger.resolve_flight(&key, FlightStatus::LateWeather).unwrap();
    assert_eq!(res, Resolution::AlreadyResolved(FlightStatus::LateTechnical));
    assert_eq!(ledger.balance_of(&id("P1")), 15);
    assert_eq!(ledger.balance_of(&id("P2")), 4);
}

#[test]
fn test_pause_blocks_mutations_only() {
    let mut ledger = funded(InsurancePolicy::default());
    let key = ledger.register_flight(&id("A0"), "MS653", TS, 10, "RUH", "HBE").unwrap();

    assert!(matches!(
        ledger.set_operating_status(&id("A0"), false),
        Err(SuretyError::NotAuthorized(_))
    ));
    ledger.set_operating_status(&id("owner"), false).unwrap();

    assert!(matches!(
        ledger.buy_insurance(&id("P"), "MS653", "HBE", TS, 1),
        Err(SuretyError::NotOperational(_))
    ));
    assert!(matches!(
        ledger.register_flight(&id("A0"), "MS654", TS, 10, "RUH", "HBE"),
        Err(SuretyError::NotOperational(_))
    ));
    assert!(matches!(ledger.withdraw(&id("P")), Err(SuretyError::NotOperational(_))));
    assert!(matches!(
        ledger.resolve_flight(&key, FlightStatus::LateAirline),
        Err(SuretyError::NotOperational(_))
    ));
    assert!(matches!(
        ledger.admit_airline(&id("A9"), &id("A0")),
        Err(SuretyError::NotOperational(_))
    ));
    assert!(!ledger.is_airline_registered(&id("A9")));
    assert_eq!(ledger.flight(&key).unwrap().status, FlightStatus::Unknown);

    assert!(ledger.is_flight_registered(&key));
    assert_eq!(ledger.get_registered_flights_count(), 1);
    assert_eq!(ledger.active_flights().len(), 1);

    ledger.set_operating_status(&id("owner"), true).unwrap();
    ledger.buy_insurance(&id("P"), "MS653", "HBE", TS, 1).unwrap();
}

#[test]
fn test_flight_enumeration_is_append_only() {
    let mut ledger = funded(InsurancePolicy::default());
    let k1 = ledger.register_flight(&id("A0"), "MS653", TS, 10, "RUH", "HBE").unwrap();
    let k2 = ledger.register_flight(&id("A0"), "MS654", TS, 10, "RUH", "HBE").unwrap();
    assert!(matches!(
        ledger.register_flight(&id("A0"), "MS653", TS, 7, "JED", "HBE"),
        Err(SuretyError::DuplicateFlight(_))
    ));

    assert_eq!(ledger.get_registered_flights_count(), 2);
    assert_eq!(ledger.flight_key_at(0), Some(&k1));
    assert_eq!(ledger.flight_key_at(1), Some(&k2));
    assert_eq!(ledger.flight_key_at(2), None);

    ledger.resolve_flight(&k1, FlightStatus::OnTime).unwrap();
    let active: Vec<&AccountId> = ledger.active_flights().into_iter().map(|f| &f.airline).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(ledger.active_flights()[0].key, k2);
}
