//! Fixed trip content rendered alongside the gallery.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Meals {
    pub breakfast: Option<&'static str>,
    pub lunch: Option<&'static str>,
    pub dinner: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ItineraryDay {
    pub day: u8,
    pub title: &'static str,
    pub emoji: &'static str,
    /// Accent colour as `#RRGGBB`.
    pub color: &'static str,
    pub meals: Meals,
    pub hotel: Option<&'static str>,
    pub activities: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Highlight {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: &'static str,
}

pub const ITINERARY: &[ItineraryDay] = &[
    ItineraryDay {
        day: 1,
        title: "桃園 → 曼谷 → 芭達雅",
        emoji: "✈️",
        color: "#FF6B6B",
        meals: Meals {
            breakfast: None,
            lunch: Some("機上餐"),
            dinner: Some("咖哩螃蟹套餐"),
        },
        hotel: Some("A-one New Wing / Manhattan Pattaya / Hotel J / Centre Point Prime（同級）"),
        activities: &[
            "抵達曼谷後前往芭達雅",
            "泰式傳統按摩 2 小時",
            "Runway Street Food Pattaya 飛機主題夜市",
        ],
    },
    ItineraryDay {
        day: 2,
        title: "芭達雅・文化 × 海天派對",
        emoji: "🛳️",
        color: "#FFA94D",
        meals: Meals {
            breakfast: Some("飯店早餐"),
            lunch: Some("泰式特色午餐"),
            dinner: Some("Ocean Sky 國際自助晚餐（暢飲）"),
        },
        hotel: Some("同 Day 1"),
        activities: &[
            "爽泰度假莊園 Suan Thai —— 泰裝體驗、水果吃到飽、騎大象、馬車、潑水節 & 水燈祭體驗",
            "佛山 Khao Chi Chan（山壁佛像）",
            "芭達雅水上市場（手划船）",
            "Terminal 21 Pattaya 購物",
            "Ocean Sky 海天派對豪華遊輪晚宴 + 人妖秀 + 男模表演",
        ],
    },
    ItineraryDay {
        day: 3,
        title: "曼谷・網紅打卡日",
        emoji: "📸",
        color: "#51CF66",
        meals: Meals {
            breakfast: Some("飯店早餐"),
            lunch: Some("斧頭豬排 BBQ 吃到飽"),
            dinner: Some("夜市自費"),
        },
        hotel: Some(
            "ibis Styles Bangkok Ratchada / Modena by Fraser / Graph Hotel / Hyatt Place Sukhumvit（同級）",
        ),
        activities: &[
            "747 飛機主題咖啡廳（含一杯飲料）",
            "四面佛祈福 & Central World / Big C 購物",
            "JODD FAIRS Ratchada 最新版網紅夜市",
        ],
    },
    ItineraryDay {
        day: 4,
        title: "大城・世界遺產巡禮",
        emoji: "🦒",
        color: "#339AF0",
        meals: Meals {
            breakfast: Some("飯店早餐"),
            lunch: Some("大城自費"),
            dinner: Some("砂鍋飯特色晚餐"),
        },
        hotel: Some("同 Day 3"),
        activities: &[
            "Sriayuthaya Lion Park —— 吉普車餵長頸鹿拍照 + 動物表演",
            "大城棉花糖春捲甜點體驗",
            "La Loubere 歐式網紅咖啡廳（含一杯飲料）",
            "瑪哈泰寺 Wat Mahathat（樹根佛頭世界遺產）",
        ],
    },
    ItineraryDay {
        day: 5,
        title: "返程 · 曼谷 → 桃園",
        emoji: "🏡",
        color: "#CC5DE8",
        meals: Meals {
            breakfast: Some("飯店早餐"),
            lunch: Some("機上餐"),
            dinner: None,
        },
        hotel: None,
        activities: &["機場 Check-in，依依不捨回台灣"],
    },
];

pub const HIGHLIGHTS: &[Highlight] = &[
    Highlight { icon: "🦒", label: "長頸鹿餵食", value: "Day 4" },
    Highlight { icon: "🛳️", label: "海天派對", value: "Day 2" },
    Highlight { icon: "💆", label: "泰式按摩", value: "2 小時" },
    Highlight { icon: "☕", label: "網紅咖啡廳", value: "2 間" },
    Highlight { icon: "🌙", label: "夜市", value: "3 個" },
    Highlight { icon: "🕌", label: "世界遺產", value: "Day 4" },
];

pub fn day(number: u8) -> Option<&'static ItineraryDay> {
    ITINERARY.iter().find(|d| d.day == number)
}

impl Meals {
    /// Labelled meals in breakfast, lunch, dinner order, skipping absent ones.
    pub fn labelled(&self) -> Vec<(&'static str, &'static str)> {
        [
            ("早餐", self.breakfast),
            ("午餐", self.lunch),
            ("晚餐", self.dinner),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
    }
}
