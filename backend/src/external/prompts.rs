//! Prompt assembly for the generative provider
//!
//! Prompts are written in Turkish; the model answers in the language it is
//! asked in and the app's users read Turkish.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use shared::{format_day_month, CropType, Field, SoilAnalysisResult};

use super::ScheduleRequest;

const TASK_TYPES: &str = r#""FERTILIZER" | "IRRIGATION" | "PESTICIDE" | "PLANTING" | "HARVEST""#;

fn yes_no(value: bool) -> &'static str {
    if value {
        "Var"
    } else {
        "Yok"
    }
}

/// "17 Ekim 2026"
fn long_date(date: NaiveDate) -> String {
    format!("{} {}", format_day_month(date), date.year())
}

pub fn soil_analysis(crop_type: CropType, size_decares: Decimal) -> String {
    let crop = crop_type.label();
    format!(
        r#"Bir ziraat mühendisi olarak ekteki toprak fotoğrafını veya laboratuvar raporunu değerlendir.

Ürün: {crop}
Tarla büyüklüğü: {size_decares} dekar

Yapılacaklar:
1. pH, azot, fosfor, potasyum ve organik madde değerlerini rapordan oku ya da görüntüden tahmin et.
2. {crop} için Türkiye iklimine uygun gübreleme önerileri yaz.
3. Dekar başına gereken gübre türünü ve miktarını hesapla.
4. Bu ürün için ideal ekim zamanını belirt (örnek: "Kasım başı").

Yalnızca şu JSON nesnesini döndür:
{{
  "ph": number (0-14),
  "nitrogen": "Low" | "Optimal" | "High",
  "phosphorus": "Low" | "Optimal" | "High",
  "potassium": "Low" | "Optimal" | "High",
  "organicMatter": number (yüzde),
  "recommendations": [string],
  "calculatedFertilizerAmount": string (örnek: "15 kg/dekar DAP"),
  "idealPlantingTime": string
}}"#
    )
}

pub fn schedule(request: &ScheduleRequest, today: NaiveDate) -> String {
    let crop = request.crop_type.label();
    let location = &request.location;
    let irrigation = yes_no(request.has_irrigation);
    let plant_date = request.plant_date.format("%Y-%m-%d");
    let today_iso = today.format("%Y-%m-%d");
    format!(
        r#"Aşağıdaki tarla için zirai takvim ve iklim uygunluk değerlendirmesi hazırla.
- Bugünün tarihi: {today_iso}
- Ürün: {crop}
- Konum: {location}
- Sulama sistemi: {irrigation}
- Planlanan işlem tarihi: {plant_date}

Kurallar:
1. {location} bölgesinin iklimini dikkate al.
2. Bölge ve tarih bu ürün için uygun değilse "warning" alanına nedenini yaz ve "tasks" listesini boş bırak.
3. Uygunsa önümüzdeki sezonun görevlerini kesin tarihlerle listele.
4. Ekim (PLANTING) ve hasat (HARVEST) tek günlük değildir; bunlar için mutlaka "endDate" ver.

Yalnızca şu JSON nesnesini döndür:
{{
  "tasks": [{{ "title": string, "type": {TASK_TYPES}, "date": "YYYY-MM-DD", "endDate": "YYYY-MM-DD" (isteğe bağlı), "description": string }}],
  "warning": string | null
}}"#
    )
}

pub fn tasks_from_analysis(field: &Field, analysis: &SoilAnalysisResult, today: NaiveDate) -> String {
    let crop = field.crop_type.label();
    let location = &field.location;
    let irrigation = yes_no(field.has_irrigation);
    let today_long = long_date(today);
    let today_iso = today.format("%Y-%m-%d");
    let recommendations = analysis.recommendations.join(", ");
    let fertilizer = &analysis.calculated_fertilizer_amount;
    let planting_time = analysis
        .ideal_planting_time
        .as_deref()
        .unwrap_or("Belirtilmemiş");
    format!(
        r#"Bir ziraat mühendisi olarak aşağıdaki toprak analizine dayanan bir tarım planı hazırla.

Girdiler:
- Bugünün tarihi: {today_long} ({today_iso})
- Konum: {location} (bölge iklimini mutlaka dikkate al)
- Ürün: {crop}
- Sulama: {irrigation}
- Analiz önerileri: {recommendations}
- Önerilen gübre miktarı: {fertilizer}
- Analizdeki ideal ekim zamanı: {planting_time}

Tarih kuralları:
1. Göreli gün sayısı verme; her görev için "YYYY-MM-DD" biçiminde kesin tarih yaz.
2. {today_iso} tarihinden önceye görev koyma.
3. Uygun zaman gelecek yıla denk geliyorsa yılı artır.
4. Tarihler {location} iklimine uygun olsun.
5. Ekim (PLANTING) ve hasat (HARVEST) için mutlaka "endDate" ile bir zaman aralığı ver; gübreleme ve sulama genelde tek gündür.

Yalnızca şu JSON dizisini döndür:
[{{ "title": string (Türkçe), "type": {TASK_TYPES}, "date": "YYYY-MM-DD", "endDate": "YYYY-MM-DD" (isteğe bağlı), "description": string (miktar dahil ayrıntı) }}]"#
    )
}

pub fn weather(location: &str) -> String {
    format!(
        r#""{location}" için Meteoroloji Genel Müdürlüğü (mgm.gov.tr) kaynaklı güncel hava durumunu bul: sıcaklık, kısa durum açıklaması, nem, rüzgar hızı ve yağış ihtimali.
Bu konuma ya da Türkiye geneline ait güncel bir radar veya uydu görüntüsü adresi bulabilirsen onu da ekle.

Yalnızca şu JSON nesnesini döndür:
{{
  "temp": number (°C),
  "condition": string (Türkçe, kısa),
  "humidity": number (yüzde),
  "windSpeed": number (km/s),
  "rainChance": number (yüzde),
  "radarImageUrl": string | null
}}"#
    )
}
