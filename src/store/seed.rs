//! Built-in animal catalog
//!
//! 30 endangered species seeded once into the `animals` table. Seeding is
//! idempotent: existing rows are matched by name and left alone.

use anyhow::Result;

use super::db::Db;

/// Catalog seed entry: (name, species, rarity, conservation status, description)
type SeedAnimal = (&'static str, &'static str, &'static str, &'static str, &'static str);

pub static ANIMAL_SEED: &[SeedAnimal] = &[
    ("Sunda Island Tiger", "Panthera tigris sondaica", "legendary", "Critically Endangered", "The smallest tiger subspecies, found only in Sumatra"),
    ("Javan Rhino", "Rhinoceros sondaicus", "legendary", "Critically Endangered", "One of the rarest large mammals on Earth"),
    ("Amur Leopard", "Panthera pardus orientalis", "legendary", "Critically Endangered", "Rarest big cat on Earth with fewer than 100 left"),
    ("Mountain Gorilla", "Gorilla beringei beringei", "legendary", "Endangered", "Gentle giant of the African mountains"),
    ("Tapanuli Orangutan", "Pongo tapanuliensis", "legendary", "Critically Endangered", "The rarest great ape species discovered in 2017"),
    ("Polar Bear", "Ursus maritimus", "epic", "Vulnerable", "Arctic ice explorer threatened by climate change"),
    ("African Forest Elephant", "Loxodonta cyclotis", "epic", "Critically Endangered", "Smaller forest-dwelling elephant of Central Africa"),
    ("Hawksbill Turtle", "Eretmochelys imbricata", "epic", "Critically Endangered", "Beautiful sea turtle with a distinctive beak"),
    ("Calamian Deer", "Axis calamianensis", "epic", "Endangered", "Endemic deer of the Calamian Islands in the Philippines"),
    ("Axolotl", "Ambystoma mexicanum", "epic", "Critically Endangered", "Smiling water monster that never grows up"),
    ("Red Wolf", "Canis rufus", "rare", "Critically Endangered", "America's most endangered wolf species"),
    ("Monarch Butterfly", "Danaus plexippus", "rare", "Endangered", "Famous for its incredible migration journey"),
    ("Red Panda", "Ailurus fulgens", "rare", "Endangered", "Fluffy forest dweller from the Himalayas"),
    ("Panda", "Ailuropoda melanoleuca", "rare", "Vulnerable", "Bamboo-munching gentle giant of China"),
    ("Mexican Bobcat", "Lynx rufus escuinapae", "rare", "Endangered", "Elusive wild cat of Mexican forests"),
    ("Chinchilla", "Chinchilla lanigera", "common", "Endangered", "Soft-furred rodent from the Andes mountains"),
    ("Otter", "Lontra felina", "common", "Endangered", "Playful marine otter of South America"),
    ("Koala", "Phascolarctos cinereus", "common", "Vulnerable", "Eucalyptus-loving tree hugger of Australia"),
    ("Langur Monkey", "Trachypithecus poliocephalus", "common", "Critically Endangered", "Golden-headed langur of Vietnam"),
    ("Pacific Pocket Mouse", "Chaetodipus fallax fallax", "common", "Endangered", "Tiny mouse once thought extinct"),
    ("Wallaby", "Petrogale lateralis", "common", "Near Threatened", "Small kangaroo relative from Australia"),
    ("Avahi", "Avahi laniger", "rare", "Vulnerable", "Woolly lemur of Madagascar's rainforests, active at night"),
    ("Blue Whale", "Balaenoptera musculus", "legendary", "Endangered", "The largest animal ever to have lived on Earth"),
    ("Gray Bat", "Myotis grisescens", "common", "Vulnerable", "Cave-dwelling bat of the southeastern United States"),
    ("Grey Parrot", "Psittacus erithacus", "rare", "Endangered", "Highly intelligent parrot known for remarkable speech ability"),
    ("Grizzly Bear", "Ursus arctos horribilis", "epic", "Threatened", "Powerful North American bear and icon of the wilderness"),
    ("Mountain Zebra", "Equus zebra", "rare", "Vulnerable", "Striped equine of southern Africa's mountain slopes"),
    ("Pangolin", "Manis javanica", "epic", "Critically Endangered", "The world's most trafficked mammal, covered in protective scales"),
    ("Seal", "Monachus monachus", "epic", "Endangered", "Mediterranean monk seal, one of the rarest marine mammals"),
    ("Wombat", "Lasiorhinus krefftii", "rare", "Critically Endangered", "Burrowing marsupial of northern Australia, extremely rare"),
];

/// Insert any catalog animals that are not in the database yet.
/// Returns the number of rows added.
pub fn ensure_catalog(db: &Db) -> Result<usize> {
    let conn = db.conn();
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO animals (name, species, rarity, conservation_status, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    let mut added = 0;
    for (name, species, rarity, status, description) in ANIMAL_SEED {
        added += stmt.execute((name, species, rarity, status, description))?;
    }
    if added > 0 {
        tracing::info!(added, "seeded animal catalog");
    }
    Ok(added)
}
