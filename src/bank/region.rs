/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

const BANK_URL: &str = "https://www.credit-agricole.fr";

/// A Crédit Agricole regional bank. The slug is what users write in config
/// and what the bank uses in its URLs.
#[derive(Debug, PartialEq, Eq)]
pub struct Region {
	pub slug: &'static str,
	pub name: &'static str,
}

impl Region {
	/// Looks a slug up in the fixed table of regional banks.
	pub fn find(slug: &str) -> Option<&'static Region> {
		REGIONS.iter().find(|r| r.slug == slug)
	}

	/// Root of this regional bank's customer site.
	pub fn base_url(&self) -> String {
		format!("{}/ca-{}", BANK_URL, self.slug)
	}

	/// Free-text address of the regional bank, for geocoding.
	pub fn address(&self) -> String {
		format!("Credit Agricole {}, France", self.name)
	}
}

macro_rules! regions {
	($($slug:literal => $name:literal,)*) => {
		[$(Region { slug: $slug, name: $name },)*]
	};
}

static REGIONS: [Region; 39] = regions! {
	"alpesprovence" => "Alpes Provence",
	"alsace-vosges" => "Alsace Vosges",
	"anjou-maine" => "Anjou Maine",
	"aquitaine" => "Aquitaine",
	"atlantique-vendee" => "Atlantique Vendée",
	"briepicardie" => "Brie Picardie",
	"centrest" => "Centre Est",
	"centrefrance" => "Centre France",
	"centreloire" => "Centre Loire",
	"centreouest" => "Centre Ouest",
	"cb" => "Champagne Bourgogne",
	"cmds" => "Charente Maritime Deux-Sèvres",
	"charente-perigord" => "Charente Périgord",
	"corse" => "Corse",
	"cotesdarmor" => "Côtes d'Armor",
	"des-savoie" => "Des Savoie",
	"finistere" => "Finistère",
	"franchecomte" => "Franche Comté",
	"guadeloupe" => "Guadeloupe",
	"illeetvilaine" => "Ille et Vilaine",
	"languedoc" => "Languedoc",
	"loirehauteloire" => "Loire Haute-Loire",
	"lorraine" => "Lorraine",
	"martinique" => "Martinique",
	"morbihan" => "Morbihan",
	"norddefrance" => "Nord de France",
	"nord-est" => "Nord Est",
	"nmp" => "Nord Midi Pyrénées",
	"normandie" => "Normandie",
	"normandie-seine" => "Normandie Seine",
	"paris" => "Paris",
	"pca" => "Provence Côte d'Azur",
	"pyrenees-gascogne" => "Pyrénées Gascogne",
	"reunion" => "Réunion",
	"sudmed" => "Sud Méditerranée",
	"sudrhonealpes" => "Sud Rhône Alpes",
	"toulouse31" => "Toulouse",
	"tourainepoitou" => "Touraine Poitou",
	"valdefrance" => "Val de France",
};
