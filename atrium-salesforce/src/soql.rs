//! SOQL query construction and literal escaping

const AFFILIATE_FIELDS: &str = "Id, Name, City__c, Country__c, Status__c";
const WORKSHOP_FIELDS: &str =
    "Id, Name, Organizing_Affiliate__c, Start_Date__c, End_Date__c, Status__c";
const FACILITATOR_FIELDS: &str = "Id, Name, Email__c";
const USER_FIELDS: &str = "Id, Name, Email, AccountId";

/// Escape a string literal for use inside single quotes
pub fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

pub fn affiliates() -> String {
    format!("SELECT {} FROM Affiliate__c ORDER BY Name", AFFILIATE_FIELDS)
}

pub fn affiliate_by_id(id: &str) -> String {
    format!(
        "SELECT {} FROM Affiliate__c WHERE Id = '{}'",
        AFFILIATE_FIELDS,
        escape_literal(id)
    )
}

pub fn workshops(affiliate_id: Option<&str>) -> String {
    match affiliate_id {
        Some(id) => format!(
            "SELECT {} FROM Workshop__c WHERE Organizing_Affiliate__c = '{}' ORDER BY Start_Date__c",
            WORKSHOP_FIELDS,
            escape_literal(id)
        ),
        None => format!(
            "SELECT {} FROM Workshop__c ORDER BY Start_Date__c",
            WORKSHOP_FIELDS
        ),
    }
}

pub fn workshop_by_id(id: &str) -> String {
    format!(
        "SELECT {} FROM Workshop__c WHERE Id = '{}'",
        WORKSHOP_FIELDS,
        escape_literal(id)
    )
}

pub fn facilitators_for_workshop(workshop_id: &str) -> String {
    format!(
        "SELECT {} FROM Facilitator__c WHERE Workshop__c = '{}'",
        FACILITATOR_FIELDS,
        escape_literal(workshop_id)
    )
}

pub fn user_by_id(id: &str) -> String {
    format!(
        "SELECT {} FROM Contact WHERE Id = '{}'",
        USER_FIELDS,
        escape_literal(id)
    )
}

pub fn user_by_email(email: &str) -> String {
    format!(
        "SELECT {} FROM Contact WHERE Email = '{}'",
        USER_FIELDS,
        escape_literal(email)
    )
}
