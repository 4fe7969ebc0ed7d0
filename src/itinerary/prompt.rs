use super::TripRequest;

const REQUEST: &[&str] = &[
    "You are a professional travel planner.",
    "Please suggest travel plan based on my preference and duration.",
    "You must return output as markdown format.",
];

const ABOUT_ME_INTRO: &[&str] = &[
    "I am Japanese who loves travel abroad and have been to 31 countries so far.",
    "What I like to do during travel is these below.",
];

const PREFERENCES: &[&str] = &[
    "Exploring nature such as sea, lake and mountains and feel the mother of earth.",
    "Walking around the town and see beautiful places.",
    "Meeting new people such as backpackers to exchange information about traveling tips and local people to get to know about local culture and history.",
    "Eating local coffee and beer as well as food.",
];

/// Build the fixed travel-planner prompt for one trip.
///
/// Deterministic: the same request always yields the same text.
pub fn build_itinerary_prompt(request: &TripRequest) -> String {
    let preferences = PREFERENCES
        .iter()
        .map(|p| format!("- {p}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "### request\n{request_block}\n\n### about me\n{about}\n{preferences}\n\n### prerequisite\n- duration : {days}days\n- destination : {destination}\n- departure : {departure}\n- next destination : {next}\n",
        request_block = REQUEST.join("\n"),
        about = ABOUT_ME_INTRO.join("\n"),
        preferences = preferences,
        days = request.days(),
        destination = request.destination(),
        departure = request.departure().format("%Y-%m-%d"),
        next = request.next_destination(),
    )
}
