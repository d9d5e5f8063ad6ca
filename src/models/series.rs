use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint<V> {
    pub date: NaiveDate,
    pub value: V,
}

/// Date-keyed series, strictly ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedSeries<V> {
    points: Vec<SeriesPoint<V>>,
}

impl<V> Default for OrderedSeries<V> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<V> OrderedSeries<V> {
    /// Build from points, sorting them by date. Later duplicates of a date
    /// are dropped.
    pub fn from_points(mut points: Vec<SeriesPoint<V>>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeriesPoint<V>> {
        self.points.iter()
    }

    pub fn points(&self) -> &[SeriesPoint<V>] {
        &self.points
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.points.iter().map(|p| &p.value)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&V> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| &self.points[i].value)
    }

    /// Apply `f` to every value, keeping the dates.
    pub fn map<U>(&self, mut f: impl FnMut(&V) -> U) -> OrderedSeries<U> {
        OrderedSeries {
            points: self
                .points
                .iter()
                .map(|p| SeriesPoint {
                    date: p.date,
                    value: f(&p.value),
                })
                .collect(),
        }
    }
}

impl<V> FromIterator<(NaiveDate, V)> for OrderedSeries<V> {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, V)>>(iter: I) -> Self {
        Self::from_points(
            iter.into_iter()
                .map(|(date, value)| SeriesPoint { date, value })
                .collect(),
        )
    }
}

impl<'a, V> IntoIterator for &'a OrderedSeries<V> {
    type Item = &'a SeriesPoint<V>;
    type IntoIter = std::slice::Iter<'a, SeriesPoint<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    #[test]
    fn test_from_iter_sorts_by_date() {
        let series: OrderedSeries<f64> = vec![(date(3), 3.0), (date(1), 1.0), (date(2), 2.0)]
            .into_iter()
            .collect();

        assert_eq!(series.dates().collect::<Vec<_>>(), vec![date(1), date(2), date(3)]);
        assert_eq!(series.get(date(2)), Some(&2.0));
        assert_eq!(series.get(date(9)), None);
    }

    #[test]
    fn test_serializes_as_point_list() {
        let series: OrderedSeries<f64> = vec![(date(1), 8.0)].into_iter().collect();
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"[{"date":"2021-01-01","value":8.0}]"#);
    }
}
