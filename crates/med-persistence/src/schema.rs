// Diesel schema shared by the SQLite and Postgres backends.
// Tablas: medicines, pharmacies, prices, generic_benefits
use diesel::allow_tables_to_appear_in_same_query;
diesel::table! {
    medicines (id) {
        id -> Text,
        brand_name -> Text,
        composition -> Text,
        strength -> Text,
        manufacturer -> Text,
        medicine_type -> Text,
        description -> Nullable<Text>,
        uses -> Nullable<Text>,
        side_effects -> Nullable<Text>,
        created_at_ts -> BigInt,
    }
}
diesel::table! {
    pharmacies (id) {
        id -> Text,
        name -> Text,
        website_url -> Nullable<Text>,
        created_at_ts -> BigInt,
    }
}
diesel::table! {
    prices (id) {
        id -> Text,
        medicine_id -> Text,
        pharmacy_id -> Text,
        price -> Text,
        price_type -> Text,
        last_updated_ts -> BigInt,
    }
}
diesel::table! {
    generic_benefits (id) {
        id -> Text,
        title -> Text,
        description -> Text,
        icon -> Text,
        display_order -> Integer,
        is_active -> Bool,
        created_at_ts -> BigInt,
    }
}
diesel::joinable!(prices -> medicines (medicine_id));
diesel::joinable!(prices -> pharmacies (pharmacy_id));
allow_tables_to_appear_in_same_query!(medicines, pharmacies, prices, generic_benefits);
